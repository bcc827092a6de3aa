// HTTP handlers for daily offers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::offers::{
    error::OfferError,
    models::{CreateOfferRequest, OfferDetail, UpdateOfferRequest},
};
use crate::orders::models::OrderType;

/// Query parameters for the active-offer listing
#[derive(Debug, Deserialize)]
pub struct ActiveOffersQuery {
    /// Restricts results to offers applicable to this order type
    pub order_type: Option<OrderType>,
}

/// Handler for GET /api/offers/active
/// Lists offers whose date window includes today, optionally filtered to an
/// order type.
pub async fn active_offers_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<ActiveOffersQuery>,
) -> Result<Json<Vec<OfferDetail>>, OfferError> {
    let today = Utc::now().date_naive();
    let mut offers = state.offers_repo.active_offers(today).await?;

    if let Some(order_type) = query.order_type {
        offers.retain(|detail| detail.offer.order_type_restriction.permits(order_type));
    }

    Ok(Json(offers))
}

/// Handler for GET /api/admin/offers
pub async fn list_offers_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<OfferDetail>>, OfferError> {
    let offers = state.offers_repo.list_offers().await?;
    Ok(Json(offers))
}

/// Handler for GET /api/admin/offers/:id
pub async fn get_offer_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferDetail>, OfferError> {
    let offer = state
        .offers_repo
        .get_offer(id)
        .await?
        .ok_or(OfferError::NotFound)?;

    Ok(Json(offer))
}

/// Handler for POST /api/admin/offers
pub async fn create_offer_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<OfferDetail>), OfferError> {
    request
        .validate()
        .map_err(|e| OfferError::ValidationError(e.to_string()))?;

    if request.offer_end_date < request.offer_start_date {
        return Err(OfferError::ValidationError(
            "offer_end_date must not precede offer_start_date".to_string(),
        ));
    }

    let offer = state.offers_repo.create_offer(&request).await?;

    tracing::info!("Created daily offer {} ({})", offer.offer.id, offer.offer.title);
    Ok((StatusCode::CREATED, Json(offer)))
}

/// Handler for PUT /api/admin/offers/:id
pub async fn update_offer_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOfferRequest>,
) -> Result<Json<OfferDetail>, OfferError> {
    request
        .validate()
        .map_err(|e| OfferError::ValidationError(e.to_string()))?;

    let offer = state.offers_repo.update_offer(id, &request).await?;

    Ok(Json(offer))
}

/// Handler for DELETE /api/admin/offers/:id
pub async fn delete_offer_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, OfferError> {
    state.offers_repo.delete_offer(id).await?;

    tracing::info!("Deleted daily offer {}", id);
    Ok(StatusCode::NO_CONTENT)
}
