use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::checkout::error::CheckoutError;

/// Error types for order operations
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Order not found")]
    NotFound,

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("Payment was declined")]
    PaymentDeclined,

    #[error("Insufficient loyalty points")]
    InsufficientPoints,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            OrderError::DatabaseError(msg) => {
                tracing::error!("Order database error: {}", msg);
                // Settlement is all-or-nothing: nothing was applied
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The order could not be placed. Please retry or contact support.".to_string(),
                )
            }
            OrderError::NotFound => (StatusCode::NOT_FOUND, "Order not found".to_string()),
            OrderError::Checkout(inner) => return inner.into_response(),
            OrderError::PaymentDeclined => (
                StatusCode::PAYMENT_REQUIRED,
                "Payment was declined. Please try again.".to_string(),
            ),
            OrderError::InsufficientPoints => {
                (StatusCode::BAD_REQUEST, "Insufficient loyalty points".to_string())
            }
            OrderError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            OrderError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            OrderError::InvalidTransition(msg) => (StatusCode::BAD_REQUEST, msg),
            OrderError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
