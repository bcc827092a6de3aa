// HTTP handlers for checkout pricing

use axum::{extract::State, Json};
use chrono::Utc;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::checkout::{
    error::CheckoutError,
    models::{CheckoutQuote, PriceLineRequest, PricedLine, QuoteRequest},
    pricing,
};
use crate::offers::models::DiscountType;

/// Handler for POST /api/checkout/price-line
/// Resolves a single cart line server-side: unit price with the best eligible
/// daily offer baked in, plus add-on prices.
pub async fn price_line_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(request): Json<PriceLineRequest>,
) -> Result<Json<PricedLine>, CheckoutError> {
    request
        .validate()
        .map_err(|e| CheckoutError::ValidationError(e.to_string()))?;

    let profile = load_profile(&state, user.user_id).await?;
    let today = Utc::now().date_naive();

    let mut lines = state
        .cart_pricer
        .price_lines(
            &profile,
            request.order_type,
            today,
            std::slice::from_ref(&request.line),
        )
        .await?;

    // price_lines returns exactly one line for a one-line input
    let line = lines
        .pop()
        .ok_or_else(|| CheckoutError::ValidationError("empty cart line".to_string()))?;

    Ok(Json(line))
}

/// Handler for POST /api/checkout/quote
/// Produces the full pricing breakdown the checkout page shows: subtotal,
/// stacked discounts, service charge, redemption, and points to earn.
pub async fn quote_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<CheckoutQuote>, CheckoutError> {
    request
        .validate()
        .map_err(|e| CheckoutError::ValidationError(e.to_string()))?;

    let profile = load_profile(&state, user.user_id).await?;
    let today = Utc::now().date_naive();

    let lines = state
        .cart_pricer
        .price_lines(&profile, request.order_type, today, &request.items)
        .await?;

    let snapshot = profile_snapshot(&profile);
    let quote = pricing::build_quote(
        lines,
        &snapshot,
        request.order_type,
        request.points_to_redeem,
        profile.loyalty_points,
    )?;

    Ok(Json(quote))
}

/// Load the full user row backing a checkout computation
pub(crate) async fn load_profile(
    state: &crate::AppState,
    user_id: i32,
) -> Result<crate::auth::models::User, CheckoutError> {
    state
        .user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| CheckoutError::DatabaseError(e.to_string()))?
        .ok_or(CheckoutError::UserNotFound)
}

/// Project the profile fields the pure pricing pipeline reads
pub(crate) fn profile_snapshot(user: &crate::auth::models::User) -> pricing::ProfileSnapshot {
    let birthday_discount_type = match user.birthday_discount_type.as_deref() {
        Some("percentage") => Some(DiscountType::Percentage),
        Some("fixed") => Some(DiscountType::Fixed),
        _ => None,
    };

    pricing::ProfileSnapshot {
        order_count: user.order_count,
        email_verified: user.email_verified,
        birthday_discount_value: user.birthday_discount_value,
        birthday_discount_type,
    }
}
