use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::models::Role;

/// Error types for authentication and authorization
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Unknown referral code")]
    UnknownReferralCode,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Authentication token expired")]
    ExpiredToken,

    #[error("Failed to generate token: {0}")]
    TokenGenerationError(String),

    #[error("Insufficient permissions: requires one of {required:?}, got {actual}")]
    InsufficientPermissions { required: &'static [Role], actual: Role },

    #[error("User not found")]
    UserNotFound,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AuthError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, self.to_string())
            }
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::WeakPassword(_)
            | AuthError::UnknownReferralCode
            | AuthError::ValidationError(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::InsufficientPermissions { .. } => {
                (StatusCode::FORBIDDEN, "Insufficient permissions".to_string())
            }
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AuthError::TokenGenerationError(_)
            | AuthError::ConfigError(_)
            | AuthError::DatabaseError(_) => {
                // Internals are logged, not leaked
                tracing::error!("Auth internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
