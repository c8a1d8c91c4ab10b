use super::errors::DomainError;
use super::order::{NewOrder, Order, OrderFilter, OrderWithItems};
use super::order_item::{OrderItem, OrderItemInput};

pub trait OrderRepository: Send + Sync + 'static {
    /// Store `order` and, when `items` is non-empty, the items tagged with the
    /// generated order id. Both writes succeed or neither does.
    fn create(&self, order: NewOrder, items: Vec<OrderItemInput>) -> Result<Order, DomainError>;
    fn find_many(&self, filter: &OrderFilter) -> Result<Vec<OrderWithItems>, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<OrderWithItems>, DomainError>;
    fn exists(&self, id: i32) -> Result<bool, DomainError>;
    /// Overwrite status and `updated_at`; `false` when no row matched `order.id`.
    fn update(&self, order: &Order) -> Result<bool, DomainError>;
    /// Remove the order; its items go with it.
    fn delete(&self, id: i32) -> Result<(), DomainError>;
}

pub trait OrderItemRepository: Send + Sync + 'static {
    fn create(&self, order_id: i32, item: OrderItemInput) -> Result<OrderItem, DomainError>;
    /// All items ordered by `(order_id, id)`.
    fn find_many(&self) -> Result<Vec<OrderItem>, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<OrderItem>, DomainError>;
    /// `None` when no row matched `item.id`.
    fn update(&self, item: &OrderItem) -> Result<Option<OrderItem>, DomainError>;
    fn delete(&self, id: i32) -> Result<(), DomainError>;
    fn distinct_makes(&self) -> Result<Vec<String>, DomainError>;
    fn distinct_models(&self, make: &str) -> Result<Vec<String>, DomainError>;
    /// Most recent year first.
    fn distinct_years(&self, make: &str, model: &str) -> Result<Vec<i32>, DomainError>;
}
