use chrono::Utc;

use crate::domain::errors::DomainError;
use crate::domain::order::{CreateOrder, NewOrder, Order, OrderFilter, OrderStatus, OrderWithItems};
use crate::domain::ports::OrderRepository;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<OrderWithItems>, DomainError> {
        self.repo.find_many(filter)
    }

    /// New orders always start as `Requested`. Items, if any, are written in
    /// the same transaction as the order but are not part of the result.
    pub fn create_order(&self, input: CreateOrder) -> Result<Order, DomainError> {
        let now = Utc::now();
        let item_count = input.items.len();
        let order = self.repo.create(
            NewOrder {
                status: OrderStatus::Requested,
                created_at: now,
                updated_at: now,
            },
            input.items,
        )?;
        log::info!("Created order {} with {} item(s)", order.id, item_count);
        Ok(order)
    }

    pub fn get_order(&self, id: i32) -> Result<Option<OrderWithItems>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn update_status(&self, id: i32, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        let Some(OrderWithItems { mut order, .. }) = self.repo.find_by_id(id)? else {
            return Ok(None);
        };

        order.status = status;
        order.updated_at = Utc::now();
        if !self.repo.update(&order)? {
            // deleted since it was read
            return Ok(None);
        }
        log::info!("Order {} moved to {}", id, status);

        Ok(Some(order))
    }

    /// Returns `false` when there was nothing to delete.
    pub fn delete_order(&self, id: i32) -> Result<bool, DomainError> {
        if !self.repo.exists(id)? {
            return Ok(false);
        }
        self.repo.delete(id)?;
        log::info!("Deleted order {}", id);
        Ok(true)
    }
}
