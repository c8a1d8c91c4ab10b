use utoipa::OpenApi;

use super::order_items;
use super::orders::{
    self, CreateOrderRequest, OrderItemRequest, OrderItemResponse, OrderResponse,
    OrderWithItemsResponse, UpdateOrderRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order,
        order_items::list_items,
        order_items::get_item,
        order_items::create_item,
        order_items::update_item,
        order_items::delete_item,
        order_items::list_makes,
        order_items::list_models,
        order_items::list_years,
    ),
    components(schemas(
        CreateOrderRequest,
        UpdateOrderRequest,
        OrderItemRequest,
        OrderResponse,
        OrderItemResponse,
        OrderWithItemsResponse,
    )),
    tags(
        (name = "orders", description = "Orders and their status"),
        (name = "order items", description = "Order items and filter lookups"),
    )
)]
pub struct ApiDoc;
