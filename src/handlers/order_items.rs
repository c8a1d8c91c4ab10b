use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use super::orders::{OrderItemRequest, OrderItemResponse};
use crate::domain::order_item::OrderItemInput;
use crate::errors::AppError;
use crate::OrderItemServiceHandle;

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateItemParams {
    /// Order the new item belongs to
    #[serde(rename = "orderId")]
    pub order_id: i32,
}

#[utoipa::path(
    get,
    path = "/orderitems",
    responses(
        (status = 200, description = "All items ordered by order id, then id", body = [OrderItemResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order items"
)]
pub async fn list_items(
    service: web::Data<OrderItemServiceHandle>,
) -> Result<HttpResponse, AppError> {
    let items = web::block(move || service.list_items()).await??;

    Ok(HttpResponse::Ok().json(
        items
            .into_iter()
            .map(OrderItemResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/orderitems/{id}",
    params(
        ("id" = i32, Path, description = "Item id"),
    ),
    responses(
        (status = 200, description = "Item found", body = OrderItemResponse),
        (status = 404, description = "Item not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order items"
)]
pub async fn get_item(
    service: web::Data<OrderItemServiceHandle>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match web::block(move || service.get_item(id)).await?? {
        Some(item) => Ok(HttpResponse::Ok().json(OrderItemResponse::from(item))),
        None => Err(AppError::item_not_found(id)),
    }
}

/// POST /orderitems?orderId={orderId}
///
/// Adds an item to an existing order.
#[utoipa::path(
    post,
    path = "/orderitems",
    params(CreateItemParams),
    request_body = OrderItemRequest,
    responses(
        (status = 201, description = "Item created", body = OrderItemResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order items"
)]
pub async fn create_item(
    service: web::Data<OrderItemServiceHandle>,
    query: web::Query<CreateItemParams>,
    body: web::Json<OrderItemRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = query.into_inner().order_id;
    let body = body.into_inner();
    body.validate()?;

    let input = OrderItemInput::from(body);
    match web::block(move || service.create_item(input, order_id)).await?? {
        Some(item) => Ok(HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/orderitems/{}", item.id)))
            .json(OrderItemResponse::from(item))),
        None => Err(AppError::order_not_found(order_id)),
    }
}

/// PUT /orderitems/{id}
///
/// Replaces make, model, year, quantity and unit price.
#[utoipa::path(
    put,
    path = "/orderitems/{id}",
    params(
        ("id" = i32, Path, description = "Item id"),
    ),
    request_body = OrderItemRequest,
    responses(
        (status = 200, description = "Item updated", body = OrderItemResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Item not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order items"
)]
pub async fn update_item(
    service: web::Data<OrderItemServiceHandle>,
    path: web::Path<i32>,
    body: web::Json<OrderItemRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let input = OrderItemInput::from(body);
    match web::block(move || service.update_item(id, input)).await?? {
        Some(item) => Ok(HttpResponse::Ok().json(OrderItemResponse::from(item))),
        None => Err(AppError::item_not_found(id)),
    }
}

#[utoipa::path(
    delete,
    path = "/orderitems/{id}",
    params(
        ("id" = i32, Path, description = "Item id"),
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order items"
)]
pub async fn delete_item(
    service: web::Data<OrderItemServiceHandle>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if web::block(move || service.delete_item(id)).await?? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::item_not_found(id))
    }
}

// ── Filter lookups (make → model → year) ─────────────────────────────────────

/// GET /orderitems/makes
///
/// Distinct makes, alphabetical.
#[utoipa::path(
    get,
    path = "/orderitems/makes",
    responses(
        (status = 200, description = "Distinct makes", body = [String]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order items"
)]
pub async fn list_makes(
    service: web::Data<OrderItemServiceHandle>,
) -> Result<HttpResponse, AppError> {
    let makes = web::block(move || service.makes()).await??;
    Ok(HttpResponse::Ok().json(makes))
}

/// GET /orderitems/{make}/models
///
/// Distinct models of `make`, alphabetical.
#[utoipa::path(
    get,
    path = "/orderitems/{make}/models",
    params(
        ("make" = String, Path, description = "Make"),
    ),
    responses(
        (status = 200, description = "Distinct models", body = [String]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order items"
)]
pub async fn list_models(
    service: web::Data<OrderItemServiceHandle>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let make = path.into_inner();
    let models = web::block(move || service.models(&make)).await??;
    Ok(HttpResponse::Ok().json(models))
}

/// GET /orderitems/{make}/{model}/years
///
/// Distinct years of `make` / `model`, most recent first.
#[utoipa::path(
    get,
    path = "/orderitems/{make}/{model}/years",
    params(
        ("make" = String, Path, description = "Make"),
        ("model" = String, Path, description = "Model"),
    ),
    responses(
        (status = 200, description = "Distinct years, descending", body = [i32]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order items"
)]
pub async fn list_years(
    service: web::Data<OrderItemServiceHandle>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (make, model) = path.into_inner();
    let years = web::block(move || service.years(&make, &model)).await??;
    Ok(HttpResponse::Ok().json(years))
}
