use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for cart validation and checkout pricing
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i32),

    #[error("'{0}' is out of stock")]
    ItemOutOfStock(String),

    #[error("Add-on not found or inactive: {0}")]
    AddonNotFound(i32),

    #[error("Add-on {addon_id} is not offered on menu item {menu_item_id}")]
    AddonNotAllowed { addon_id: i32, menu_item_id: i32 },

    #[error("Invalid add-on selection: {0}")]
    AddonSelectionInvalid(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid points redemption: {0}")]
    InvalidRedemption(String),

    #[error("User not found")]
    UserNotFound,

    #[error("No loyalty levels configured")]
    NoLevelsConfigured,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::DatabaseError(err.to_string())
    }
}

impl From<crate::error::ApiError> for CheckoutError {
    fn from(err: crate::error::ApiError) -> Self {
        CheckoutError::DatabaseError(format!("{:?}", err))
    }
}

impl From<crate::offers::OfferError> for CheckoutError {
    fn from(err: crate::offers::OfferError) -> Self {
        CheckoutError::DatabaseError(err.to_string())
    }
}

impl From<crate::loyalty::LoyaltyError> for CheckoutError {
    fn from(err: crate::loyalty::LoyaltyError) -> Self {
        match err {
            crate::loyalty::LoyaltyError::UserNotFound => CheckoutError::UserNotFound,
            crate::loyalty::LoyaltyError::NoLevelsConfigured => CheckoutError::NoLevelsConfigured,
            other => CheckoutError::DatabaseError(other.to_string()),
        }
    }
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            CheckoutError::DatabaseError(msg) => {
                tracing::error!("Checkout database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            CheckoutError::NoLevelsConfigured => {
                tracing::error!("Checkout failed: no loyalty levels configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.to_string(),
                )
            }
            CheckoutError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            CheckoutError::MenuItemNotFound(_) | CheckoutError::AddonNotFound(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            CheckoutError::ItemOutOfStock(_)
            | CheckoutError::AddonNotAllowed { .. }
            | CheckoutError::AddonSelectionInvalid(_)
            | CheckoutError::InvalidQuantity(_)
            | CheckoutError::InvalidRedemption(_)
            | CheckoutError::ValidationError(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
