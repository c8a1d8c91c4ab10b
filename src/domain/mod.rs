pub mod aggregation;
pub mod errors;
pub mod order;
pub mod order_item;
pub mod ports;
