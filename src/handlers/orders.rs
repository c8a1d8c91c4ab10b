use actix_web::http::header;
use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::domain::order::{CreateOrder, Order, OrderFilter, OrderStatus, OrderWithItems};
use crate::domain::order_item::{OrderItem, OrderItemInput};
use crate::errors::AppError;
use crate::OrderServiceHandle;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Prices are stored as NUMERIC(18, 2).
const PRICE_SCALE: i64 = 2;
const PRICE_INTEGER_DIGITS: u32 = 16;

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub(crate) fn validate_unit_price(price: &BigDecimal) -> Result<(), ValidationError> {
    if *price < BigDecimal::from(0) {
        return Err(validation_error("range", "Unit price must not be negative"));
    }
    if *price >= BigDecimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
        return Err(validation_error("range", "Unit price is too large"));
    }
    let (_, scale) = price.normalized().as_bigint_and_exponent();
    if scale > PRICE_SCALE {
        return Err(validation_error(
            "scale",
            "Unit price must have at most two decimal places",
        ));
    }
    Ok(())
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("blank", "Must not be blank"));
    }
    Ok(())
}

/// Item fields accepted when creating or replacing an order item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub make: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: String,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// Decimal price; a JSON string such as "9.99" avoids floating-point rounding
    #[validate(custom = "validate_unit_price")]
    #[schema(value_type = String, example = "95000.00")]
    pub unit_price: BigDecimal,
}

impl From<OrderItemRequest> for OrderItemInput {
    fn from(req: OrderItemRequest) -> Self {
        OrderItemInput {
            make: req.make,
            model: req.model,
            year: req.year,
            quantity: req.quantity,
            unit_price: req.unit_price,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Optional initial items; omitted or empty creates an order without items
    #[serde(default)]
    #[validate]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    /// One of Requested, InProgress, Completed, Cancelled
    #[schema(value_type = String, example = "InProgress")]
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    #[schema(value_type = String, example = "Requested")]
    pub status: OrderStatus,
    pub total_value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            status: order.status,
            total_value: order.total_value.to_string(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: i32,
    pub order_id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub quantity: i32,
    pub unit_price: String,
    /// quantity × unitPrice
    pub subtotal: String,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        OrderItemResponse {
            subtotal: item.subtotal().to_string(),
            id: item.id,
            order_id: item.order_id,
            make: item.make,
            model: item.model,
            year: item.year,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItemsResponse {
    pub id: i32,
    #[schema(value_type = String, example = "Requested")]
    pub status: OrderStatus,
    pub total_value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderWithItems> for OrderWithItemsResponse {
    fn from(view: OrderWithItems) -> Self {
        let OrderWithItems { order, items } = view;
        OrderWithItemsResponse {
            id: order.id,
            status: order.status,
            total_value: order.total_value.to_string(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

// ── Filtering ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Only orders with an item of this make
    pub make: Option<String>,
    /// Only orders with an item of this model
    pub model: Option<String>,
    /// Only orders with an item of this year
    #[param(value_type = Option<i32>)]
    pub year: Option<String>,
}

impl TryFrom<ListOrdersParams> for OrderFilter {
    type Error = AppError;

    fn try_from(params: ListOrdersParams) -> Result<Self, Self::Error> {
        // `?make=&year=` from untouched form fields means "no filter"
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let year = present(params.year)
            .map(|raw| {
                raw.trim()
                    .parse::<i32>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid year '{}'", raw)))
            })
            .transpose()?;
        Ok(OrderFilter {
            make: present(params.make),
            model: present(params.model),
            year,
        })
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// Returns every order with its items, optionally restricted to orders that
/// carry an item matching the make / model / year filter.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Orders with their items", body = [OrderWithItemsResponse]),
        (status = 400, description = "Year is not a number"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<OrderServiceHandle>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let filter = OrderFilter::try_from(query.into_inner())?;

    let orders = web::block(move || service.list_orders(&filter)).await??;

    Ok(HttpResponse::Ok().json(
        orders
            .into_iter()
            .map(OrderWithItemsResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /orders/{id}
///
/// Returns the order together with its items.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderWithItemsResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<OrderServiceHandle>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let order = web::block(move || service.get_order(id)).await??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderWithItemsResponse::from(order))),
        None => Err(AppError::order_not_found(id)),
    }
}

/// POST /orders
///
/// Creates a new order in status `Requested`. The order row and its initial
/// items are written in a single database transaction. The response carries
/// the order header only.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderServiceHandle>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let input = CreateOrder {
        items: body.items.into_iter().map(OrderItemInput::from).collect(),
    };
    let order = web::block(move || service.create_order(input)).await??;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/orders/{}", order.id)))
        .json(OrderResponse::from(order)))
}

/// PUT /orders/{id}
///
/// Replaces the order status.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    service: web::Data<OrderServiceHandle>,
    path: web::Path<i32>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status = body.into_inner().status;

    let order = web::block(move || service.update_status(id, status)).await??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::order_not_found(id)),
    }
}

/// DELETE /orders/{id}
///
/// Deletes the order and all of its items.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<OrderServiceHandle>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let deleted = web::block(move || service.delete_order(id)).await??;

    if deleted {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::order_not_found(id))
    }
}
