// HTTP handlers for admin user management (routes are admin-gated)

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::offers::models::DiscountType;
use crate::users::models::{AdminUserView, GrantBirthdayDiscountRequest, UpdateRoleRequest};

/// Handler for GET /api/admin/users
pub async fn list_users_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<AdminUserView>>, ApiError> {
    let users = state.users_admin_repo.list_users().await?;
    Ok(Json(users))
}

/// Handler for GET /api/admin/users/:id
pub async fn get_user_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AdminUserView>, ApiError> {
    let user = state.users_admin_repo.get_user(id).await?;
    Ok(Json(user))
}

/// Handler for PATCH /api/admin/users/:id/role
pub async fn update_role_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<AdminUserView>, ApiError> {
    let user = state.users_admin_repo.set_role(id, request.role).await?;

    tracing::info!("User {} role changed to {}", id, request.role);
    Ok(Json(user))
}

/// Handler for POST /api/admin/users/:id/birthday-discount
pub async fn grant_birthday_discount_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<GrantBirthdayDiscountRequest>,
) -> Result<Json<AdminUserView>, ApiError> {
    request.validate()?;

    let discount_type = match request.discount_type {
        DiscountType::Fixed => "fixed",
        DiscountType::Percentage => "percentage",
    };

    let user = state
        .users_admin_repo
        .grant_birthday_discount(id, request.value, discount_type)
        .await?;

    tracing::info!(
        "Granted birthday discount ({} {}) to user {}",
        request.value,
        discount_type,
        id
    );
    Ok(Json(user))
}

/// Handler for POST /api/admin/users/:id/verify-email
pub async fn verify_email_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AdminUserView>, ApiError> {
    let user = state.users_admin_repo.set_email_verified(id).await?;

    tracing::info!("User {} marked email-verified", id);
    Ok(Json(user))
}
