use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for loyalty operations
#[derive(Debug, thiserror::Error)]
pub enum LoyaltyError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Loyalty level not found")]
    LevelNotFound,

    #[error("Loyalty level with that name or threshold already exists")]
    DuplicateLevel,

    #[error("No loyalty levels configured")]
    NoLevelsConfigured,

    #[error("Reward already claimed")]
    RewardAlreadyClaimed,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for LoyaltyError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return LoyaltyError::DuplicateLevel;
            }
        }
        LoyaltyError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for LoyaltyError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            LoyaltyError::DatabaseError(msg) => {
                tracing::error!("Loyalty database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            LoyaltyError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            LoyaltyError::LevelNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            LoyaltyError::DuplicateLevel => (StatusCode::CONFLICT, self.to_string()),
            LoyaltyError::NoLevelsConfigured => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            LoyaltyError::RewardAlreadyClaimed => (StatusCode::CONFLICT, self.to_string()),
            LoyaltyError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
