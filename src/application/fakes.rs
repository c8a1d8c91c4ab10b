//! In-memory repositories that record every call, for service tests.

use std::sync::{Arc, Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::Utc;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderFilter, OrderStatus, OrderWithItems};
use crate::domain::order_item::{OrderItem, OrderItemInput};
use crate::domain::ports::{OrderItemRepository, OrderRepository};

#[derive(Debug, Clone, PartialEq)]
pub enum OrderCall {
    Create,
    FindMany(OrderFilter),
    FindById(i32),
    Exists(i32),
    Update(i32),
    Delete(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemCall {
    Create(i32),
    FindMany,
    FindById(i32),
    Update(i32),
    Delete(i32),
    Makes,
    Models(String),
    Years(String, String),
}

#[derive(Default)]
struct State {
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    next_order_id: i32,
    next_item_id: i32,
    item_batches: usize,
    vanish_on_update: bool,
    order_calls: Vec<OrderCall>,
    item_calls: Vec<ItemCall>,
}

impl State {
    fn insert_item(&mut self, order_id: i32, input: OrderItemInput) -> OrderItem {
        self.next_item_id += 1;
        let item = OrderItem {
            id: self.next_item_id,
            order_id,
            make: input.make,
            model: input.model,
            year: input.year,
            quantity: input.quantity,
            unit_price: input.unit_price,
        };
        self.items.push(item.clone());
        item
    }

    fn with_items(&self, order: &Order, keep: impl Fn(&OrderItem) -> bool) -> OrderWithItems {
        let items: Vec<OrderItem> = self
            .items
            .iter()
            .filter(|i| i.order_id == order.id && keep(i))
            .cloned()
            .collect();
        let mut view = OrderWithItems {
            order: order.clone(),
            items,
        };
        view.order.total_value = self
            .items
            .iter()
            .filter(|i| i.order_id == order.id)
            .map(OrderItem::subtotal)
            .fold(BigDecimal::from(0), |acc, s| acc + s);
        view
    }
}

/// Shared backing store; hand out repositories with [`FakeStore::orders`] and
/// [`FakeStore::items`].
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<State>>,
}

impl FakeStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fake store poisoned")
    }

    pub fn orders(&self) -> FakeOrderRepository {
        FakeOrderRepository {
            store: self.clone(),
        }
    }

    pub fn items(&self) -> FakeOrderItemRepository {
        FakeOrderItemRepository {
            store: self.clone(),
        }
    }

    pub fn seed_order(&self, status: OrderStatus, items: Vec<OrderItemInput>) -> i32 {
        let mut state = self.lock();
        state.next_order_id += 1;
        let id = state.next_order_id;
        let now = Utc::now();
        state.orders.push(Order {
            id,
            status,
            total_value: BigDecimal::from(0),
            created_at: now,
            updated_at: now,
        });
        for item in items {
            state.insert_item(id, item);
        }
        id
    }

    pub fn seed_item(&self, order_id: i32, item: OrderItemInput) -> i32 {
        self.lock().insert_item(order_id, item).id
    }

    pub fn order(&self, id: i32) -> Option<Order> {
        self.lock().orders.iter().find(|o| o.id == id).cloned()
    }

    pub fn exists(&self, id: i32) -> bool {
        self.order(id).is_some()
    }

    pub fn item(&self, id: i32) -> Option<OrderItem> {
        self.lock().items.iter().find(|i| i.id == id).cloned()
    }

    pub fn items_of(&self, order_id: i32) -> Vec<OrderItem> {
        self.lock()
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect()
    }

    /// The next `update` first deletes the row it targets, as a concurrent
    /// delete between read and write would.
    pub fn vanish_on_update(&self) {
        self.lock().vanish_on_update = true;
    }

    pub fn item_batches(&self) -> usize {
        self.lock().item_batches
    }

    pub fn order_calls(&self) -> Vec<OrderCall> {
        self.lock().order_calls.clone()
    }

    pub fn item_calls(&self) -> Vec<ItemCall> {
        self.lock().item_calls.clone()
    }
}

pub struct FakeOrderRepository {
    store: FakeStore,
}

impl OrderRepository for FakeOrderRepository {
    fn create(&self, order: NewOrder, items: Vec<OrderItemInput>) -> Result<Order, DomainError> {
        let mut state = self.store.lock();
        state.order_calls.push(OrderCall::Create);
        state.next_order_id += 1;
        let header = Order {
            id: state.next_order_id,
            status: order.status,
            total_value: BigDecimal::from(0),
            created_at: order.created_at,
            updated_at: order.updated_at,
        };
        state.orders.push(header.clone());
        if !items.is_empty() {
            state.item_batches += 1;
            for item in items {
                state.insert_item(header.id, item);
            }
        }
        Ok(state.with_items(&header, |_| true).order)
    }

    fn find_many(&self, filter: &OrderFilter) -> Result<Vec<OrderWithItems>, DomainError> {
        let mut state = self.store.lock();
        state.order_calls.push(OrderCall::FindMany(filter.clone()));
        let matches = |i: &OrderItem| {
            filter.make.as_ref().map_or(true, |m| &i.make == m)
                && filter.model.as_ref().map_or(true, |m| &i.model == m)
                && filter.year.map_or(true, |y| i.year == y)
        };
        Ok(state
            .orders
            .iter()
            .map(|o| state.with_items(o, matches))
            .filter(|o| filter.is_empty() || !o.items.is_empty())
            .collect())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderWithItems>, DomainError> {
        let mut state = self.store.lock();
        state.order_calls.push(OrderCall::FindById(id));
        Ok(state
            .orders
            .iter()
            .find(|o| o.id == id)
            .map(|o| state.with_items(o, |_| true)))
    }

    fn exists(&self, id: i32) -> Result<bool, DomainError> {
        let mut state = self.store.lock();
        state.order_calls.push(OrderCall::Exists(id));
        Ok(state.orders.iter().any(|o| o.id == id))
    }

    fn update(&self, order: &Order) -> Result<bool, DomainError> {
        let mut state = self.store.lock();
        state.order_calls.push(OrderCall::Update(order.id));
        if std::mem::take(&mut state.vanish_on_update) {
            state.orders.retain(|o| o.id != order.id);
        }
        match state.orders.iter_mut().find(|o| o.id == order.id) {
            Some(stored) => {
                stored.status = order.status;
                stored.updated_at = order.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut state = self.store.lock();
        state.order_calls.push(OrderCall::Delete(id));
        state.orders.retain(|o| o.id != id);
        state.items.retain(|i| i.order_id != id);
        Ok(())
    }
}

pub struct FakeOrderItemRepository {
    store: FakeStore,
}

impl FakeOrderItemRepository {
    fn record(&self, call: ItemCall) -> MutexGuard<'_, State> {
        let mut state = self.store.lock();
        state.item_calls.push(call);
        state
    }
}

impl OrderItemRepository for FakeOrderItemRepository {
    fn create(&self, order_id: i32, item: OrderItemInput) -> Result<OrderItem, DomainError> {
        Ok(self.record(ItemCall::Create(order_id)).insert_item(order_id, item))
    }

    fn find_many(&self) -> Result<Vec<OrderItem>, DomainError> {
        Ok(self.record(ItemCall::FindMany).items.clone())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderItem>, DomainError> {
        let state = self.record(ItemCall::FindById(id));
        Ok(state.items.iter().find(|i| i.id == id).cloned())
    }

    fn update(&self, item: &OrderItem) -> Result<Option<OrderItem>, DomainError> {
        let mut state = self.record(ItemCall::Update(item.id));
        if std::mem::take(&mut state.vanish_on_update) {
            state.items.retain(|i| i.id != item.id);
        }
        Ok(state
            .items
            .iter_mut()
            .find(|i| i.id == item.id)
            .map(|stored| {
                *stored = item.clone();
                item.clone()
            }))
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.record(ItemCall::Delete(id)).items.retain(|i| i.id != id);
        Ok(())
    }

    fn distinct_makes(&self) -> Result<Vec<String>, DomainError> {
        let state = self.record(ItemCall::Makes);
        Ok(first_seen(state.items.iter().map(|i| i.make.clone())))
    }

    fn distinct_models(&self, make: &str) -> Result<Vec<String>, DomainError> {
        let state = self.record(ItemCall::Models(make.to_string()));
        Ok(first_seen(
            state
                .items
                .iter()
                .filter(|i| i.make == make)
                .map(|i| i.model.clone()),
        ))
    }

    fn distinct_years(&self, make: &str, model: &str) -> Result<Vec<i32>, DomainError> {
        let state = self.record(ItemCall::Years(make.to_string(), model.to_string()));
        Ok(first_seen(
            state
                .items
                .iter()
                .filter(|i| i.make == make && i.model == model)
                .map(|i| i.year),
        ))
    }
}

/// Distinct values in storage order; sorting is the database's job.
fn first_seen<T: PartialEq>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
