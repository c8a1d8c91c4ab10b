//! Typed HTTP client for the orders API.
//!
//! Mirrors what a front end needs: one method per endpoint, input validation
//! against the same constraints the server enforces, and a single error type
//! whose message is the one the server put in its `message` field.

mod cascade;

pub use cascade::FilterCascade;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::OrderFilter;
use crate::handlers::orders::{
    CreateOrderRequest, OrderItemRequest, OrderItemResponse, OrderResponse,
    OrderWithItemsResponse, UpdateOrderRequest,
};

const FALLBACK_MESSAGE: &str = "Unexpected error occurred";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid base URL '{0}'")]
    BaseUrl(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Pick the user-facing message for a failed response: the body's `message`
/// field, else the status reason, else a generic fallback.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

/// Query pairs for a listing filter; absent and blank values are left out.
pub(crate) fn filter_query(filter: &OrderFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(make) = filter.make.as_deref().filter(|m| !m.is_empty()) {
        params.push(("make", make.to_string()));
    }
    if let Some(model) = filter.model.as_deref().filter(|m| !m.is_empty()) {
        params.push(("model", model.to_string()));
    }
    if let Some(year) = filter.year {
        params.push(("year", year.to_string()));
    }
    params
}

#[derive(Debug, Clone)]
pub struct OrdersClient {
    http: Client,
    base_url: Url,
}

impl OrdersClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|_| ClientError::BaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::BaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// Base URL extended with percent-encoded path `segments`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        Ok(self.http.request(method, self.endpoint(segments)?))
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        log::error!("{} ({})", message, status);
        Err(ClientError::Api { status, message })
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        Ok(Self::send(builder).await?.json::<T>().await?)
    }

    // ── Orders ───────────────────────────────────────────────────────────────

    pub async fn list_orders(
        &self,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderWithItemsResponse>, ClientError> {
        let builder = self
            .request(Method::GET, &["orders"])?
            .query(&filter_query(filter));
        Self::json(builder).await
    }

    pub async fn get_order(&self, id: i32) -> Result<OrderWithItemsResponse, ClientError> {
        Self::json(self.request(Method::GET, &["orders", &id.to_string()])?).await
    }

    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<OrderResponse, ClientError> {
        request.validate()?;
        Self::json(self.request(Method::POST, &["orders"])?.json(request)).await
    }

    pub async fn update_order(
        &self,
        id: i32,
        request: &UpdateOrderRequest,
    ) -> Result<OrderResponse, ClientError> {
        let builder = self
            .request(Method::PUT, &["orders", &id.to_string()])?
            .json(request);
        Self::json(builder).await
    }

    pub async fn delete_order(&self, id: i32) -> Result<(), ClientError> {
        Self::send(self.request(Method::DELETE, &["orders", &id.to_string()])?).await?;
        Ok(())
    }

    // ── Order items ──────────────────────────────────────────────────────────

    pub async fn list_items(&self) -> Result<Vec<OrderItemResponse>, ClientError> {
        Self::json(self.request(Method::GET, &["orderitems"])?).await
    }

    pub async fn get_item(&self, id: i32) -> Result<OrderItemResponse, ClientError> {
        Self::json(self.request(Method::GET, &["orderitems", &id.to_string()])?).await
    }

    pub async fn create_item(
        &self,
        order_id: i32,
        request: &OrderItemRequest,
    ) -> Result<OrderItemResponse, ClientError> {
        request.validate()?;
        let builder = self
            .request(Method::POST, &["orderitems"])?
            .query(&[("orderId", order_id)])
            .json(request);
        Self::json(builder).await
    }

    pub async fn update_item(
        &self,
        id: i32,
        request: &OrderItemRequest,
    ) -> Result<OrderItemResponse, ClientError> {
        request.validate()?;
        let builder = self
            .request(Method::PUT, &["orderitems", &id.to_string()])?
            .json(request);
        Self::json(builder).await
    }

    pub async fn delete_item(&self, id: i32) -> Result<(), ClientError> {
        Self::send(self.request(Method::DELETE, &["orderitems", &id.to_string()])?).await?;
        Ok(())
    }

    pub async fn makes(&self) -> Result<Vec<String>, ClientError> {
        Self::json(self.request(Method::GET, &["orderitems", "makes"])?).await
    }

    pub async fn models(&self, make: &str) -> Result<Vec<String>, ClientError> {
        Self::json(self.request(Method::GET, &["orderitems", make, "models"])?).await
    }

    pub async fn years(&self, make: &str, model: &str) -> Result<Vec<i32>, ClientError> {
        Self::json(self.request(Method::GET, &["orderitems", make, model, "years"])?).await
    }
}
