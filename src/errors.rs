use actix_web::error::BlockingError;
use actix_web::HttpResponse;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{entity} with ID {id} not found.")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn order_not_found(id: i32) -> Self {
        AppError::NotFound { entity: "Order", id }
    }

    pub fn item_not_found(id: i32) -> Self {
        AppError::NotFound { entity: "Item", id }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<BlockingError> for AppError {
    fn from(e: BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound { .. } => HttpResponse::NotFound().json(serde_json::json!({
                "message": self.to_string()
            })),
            AppError::Validation(errors) => HttpResponse::BadRequest().json(serde_json::json!({
                "message": self.to_string(),
                "errors": errors
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "message": msg
            })),
            AppError::Internal(msg) => {
                log::error!("Request failed: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use validator::Validate;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::order_not_found(3).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn not_found_body_names_entity_and_id() {
        let resp = AppError::item_not_found(12).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Item with ID 12 not found.");
    }

    #[test]
    fn validation_error_returns_400() {
        #[derive(Validate)]
        struct Probe {
            #[validate(range(min = 1))]
            quantity: i32,
        }
        let errors = Probe { quantity: 0 }.validate().unwrap_err();

        let resp = AppError::from(errors).error_response();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn bad_request_returns_400() {
        let err = AppError::BadRequest("Json deserialize error".to_string());
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_display() {
        assert_eq!(
            AppError::order_not_found(5).to_string(),
            "Order with ID 5 not found."
        );
    }

    #[test]
    fn domain_errors_map_to_internal() {
        for err in [
            DomainError::Database("boom".to_string()),
            DomainError::Pool("timeout".to_string()),
            DomainError::InvalidData("bad status".to_string()),
        ] {
            assert!(matches!(AppError::from(err), AppError::Internal(_)));
        }
    }
}
