use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for daily-offer operations
#[derive(Debug, thiserror::Error)]
pub enum OfferError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Offer not found")]
    NotFound,

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i32),

    #[error("Loyalty level not found: {0}")]
    LoyaltyLevelNotFound(i32),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for OfferError {
    fn from(err: sqlx::Error) -> Self {
        OfferError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for OfferError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            OfferError::DatabaseError(msg) => {
                tracing::error!("Offer database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            OfferError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            OfferError::MenuItemNotFound(id) => (
                StatusCode::BAD_REQUEST,
                format!("Menu item with id {} not found", id),
            ),
            OfferError::LoyaltyLevelNotFound(id) => (
                StatusCode::BAD_REQUEST,
                format!("Loyalty level with id {} not found", id),
            ),
            OfferError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
