pub mod order_item_service;
pub mod order_service;

#[cfg(test)]
pub(crate) mod fakes;
