// HTTP handlers for order endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::orders::{
    error::OrderError,
    models::{OrderResponse, OrderStatus, PlaceOrderRequest, UpdateStatusRequest},
};

/// Query parameters for order listings
#[derive(Debug, Deserialize)]
pub struct OrderHistoryQuery {
    /// Optional status filter
    pub status: Option<OrderStatus>,
}

/// Handler for POST /api/orders
/// Places an order: re-prices the cart, charges the gateway, settles
pub async fn place_order_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), OrderError> {
    request
        .validate()
        .map_err(|e| OrderError::ValidationError(e.to_string()))?;

    let order = state.order_service.place_order(user.user_id, request).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Handler for GET /api/orders
/// Retrieves order history for the authenticated user
pub async fn get_order_history_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Query(query): Query<OrderHistoryQuery>,
) -> Result<Json<Vec<OrderResponse>>, OrderError> {
    let orders = state
        .order_service
        .get_user_orders(user.user_id, query.status)
        .await?;

    Ok(Json(orders))
}

/// Handler for GET /api/orders/{order_id}
/// Customers see their own orders; staff and admin see any
pub async fn get_order_by_id_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, OrderError> {
    let order = state
        .order_service
        .get_order_by_id(order_id, user.user_id, user.is_staff())
        .await?;

    Ok(Json(order))
}

/// Handler for GET /api/admin/orders
/// Lists all orders for the fulfilment screens (route is staff-gated)
pub async fn list_all_orders_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<OrderHistoryQuery>,
) -> Result<Json<Vec<OrderResponse>>, OrderError> {
    let orders = state.order_service.get_all_orders(query.status).await?;

    Ok(Json(orders))
}

/// Handler for PATCH /api/admin/orders/{order_id}/status
/// Updates the status of an order (route is staff-gated)
pub async fn update_order_status_handler(
    State(state): State<crate::AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, OrderError> {
    let order = state
        .order_service
        .update_order_status(order_id, request.status)
        .await?;

    Ok(Json(order))
}
