// HTTP handlers for loyalty endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::loyalty::{
    error::LoyaltyError,
    models::{
        ClaimRewardRequest, ClaimRewardResponse, CreateLoyaltyLevelRequest, LoyaltyLevel,
        LoyaltySummary, PointTransaction, UpdateLoyaltyLevelRequest,
    },
};

/// Handler for GET /api/loyalty/summary
pub async fn loyalty_summary_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> Result<Json<LoyaltySummary>, LoyaltyError> {
    let summary = state.loyalty_service.summary(user.user_id).await?;
    Ok(Json(summary))
}

/// Handler for GET /api/loyalty/transactions
pub async fn list_transactions_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<PointTransaction>>, LoyaltyError> {
    let transactions = state.loyalty_repo.list_transactions(user.user_id).await?;
    Ok(Json(transactions))
}

/// Handler for POST /api/loyalty/rewards/claim
pub async fn claim_reward_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(request): Json<ClaimRewardRequest>,
) -> Result<Json<ClaimRewardResponse>, LoyaltyError> {
    let response = state
        .loyalty_service
        .claim_reward(user.user_id, request.reward)
        .await?;

    Ok(Json(response))
}

/// Handler for GET /api/loyalty/levels
/// Public: the tier ladder is shown on the customer-facing loyalty page
pub async fn list_levels_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<LoyaltyLevel>>, LoyaltyError> {
    let levels = state.loyalty_repo.list_levels().await?;
    Ok(Json(levels))
}

/// Handler for POST /api/admin/loyalty-levels
pub async fn create_level_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoyaltyLevelRequest>,
) -> Result<(StatusCode, Json<LoyaltyLevel>), LoyaltyError> {
    request
        .validate()
        .map_err(|e| LoyaltyError::ValidationError(e.to_string()))?;

    let level = state
        .loyalty_repo
        .create_level(&request.name, request.minimum_points)
        .await?;

    tracing::info!("Created loyalty level {} ({})", level.id, level.name);
    Ok((StatusCode::CREATED, Json(level)))
}

/// Handler for PUT /api/admin/loyalty-levels/{id}
pub async fn update_level_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateLoyaltyLevelRequest>,
) -> Result<Json<LoyaltyLevel>, LoyaltyError> {
    request
        .validate()
        .map_err(|e| LoyaltyError::ValidationError(e.to_string()))?;

    let level = state
        .loyalty_repo
        .update_level(id, request.name.as_deref(), request.minimum_points)
        .await?;

    Ok(Json(level))
}

/// Handler for DELETE /api/admin/loyalty-levels/{id}
pub async fn delete_level_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, LoyaltyError> {
    state.loyalty_repo.delete_level(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
