use crate::domain::errors::DomainError;
use crate::domain::order_item::{OrderItem, OrderItemInput};
use crate::domain::ports::{OrderItemRepository, OrderRepository};

pub struct OrderItemService<I, O> {
    items: I,
    orders: O,
}

impl<I: OrderItemRepository, O: OrderRepository> OrderItemService<I, O> {
    pub fn new(items: I, orders: O) -> Self {
        Self { items, orders }
    }

    /// `None` when `order_id` does not name an existing order.
    pub fn create_item(
        &self,
        input: OrderItemInput,
        order_id: i32,
    ) -> Result<Option<OrderItem>, DomainError> {
        if !self.orders.exists(order_id)? {
            return Ok(None);
        }
        let item = self.items.create(order_id, input)?;
        log::info!("Added item {} to order {}", item.id, order_id);
        Ok(Some(item))
    }

    pub fn list_items(&self) -> Result<Vec<OrderItem>, DomainError> {
        self.items.find_many()
    }

    pub fn get_item(&self, id: i32) -> Result<Option<OrderItem>, DomainError> {
        self.items.find_by_id(id)
    }

    pub fn update_item(
        &self,
        id: i32,
        input: OrderItemInput,
    ) -> Result<Option<OrderItem>, DomainError> {
        let Some(mut item) = self.items.find_by_id(id)? else {
            return Ok(None);
        };
        item.apply(input);
        let updated = self.items.update(&item)?;
        if updated.is_some() {
            log::debug!("Updated item {}", id);
        }
        Ok(updated)
    }

    pub fn delete_item(&self, id: i32) -> Result<bool, DomainError> {
        if self.items.find_by_id(id)?.is_none() {
            return Ok(false);
        }
        self.items.delete(id)?;
        log::info!("Deleted item {}", id);
        Ok(true)
    }

    pub fn makes(&self) -> Result<Vec<String>, DomainError> {
        self.items.distinct_makes()
    }

    pub fn models(&self, make: &str) -> Result<Vec<String>, DomainError> {
        self.items.distinct_models(make)
    }

    pub fn years(&self, make: &str, model: &str) -> Result<Vec<i32>, DomainError> {
        self.items.distinct_years(make, model)
    }
}
