pub mod openapi;
pub mod order_items;
pub mod orders;
