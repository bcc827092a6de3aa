use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::orders::models::OrderType;

/// How an offer's discount value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Flat amount subtracted from the price
    Fixed,
    /// Percentage of the price
    Percentage,
}

/// Which order types an offer applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderTypeRestriction {
    Both,
    DineIn,
    Takeaway,
}

impl OrderTypeRestriction {
    /// Whether an offer restricted this way applies to the given order type
    pub fn permits(&self, order_type: OrderType) -> bool {
        match self {
            OrderTypeRestriction::Both => true,
            OrderTypeRestriction::DineIn => order_type == OrderType::DineIn,
            OrderTypeRestriction::Takeaway => order_type == OrderType::Takeaway,
        }
    }
}

/// A daily offer row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyOffer {
    pub id: Uuid,
    pub title: String,
    pub discount_type: DiscountType,
    /// Inclusive date window
    pub offer_start_date: NaiveDate,
    pub offer_end_date: NaiveDate,
    pub order_type_restriction: OrderTypeRestriction,
    pub created_at: DateTime<Utc>,
}

impl DailyOffer {
    /// Whether the inclusive date window contains `today`
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.offer_start_date <= today && today <= self.offer_end_date
    }
}

/// A per-tier discount value attached to an offer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TierDiscount {
    pub loyalty_level_id: i32,
    pub value: Decimal,
}

/// An offer with its item list and tier-discount map
#[derive(Debug, Clone, Serialize)]
pub struct OfferDetail {
    #[serde(flatten)]
    pub offer: DailyOffer,
    pub menu_item_ids: Vec<i32>,
    pub tier_discounts: Vec<TierDiscount>,
}

/// Tier discount entry on a create/update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TierDiscountRequest {
    pub loyalty_level_id: i32,
    #[validate(custom = "crate::validation::validate_non_negative_price")]
    pub value: Decimal,
}

/// Request DTO for creating a daily offer
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOfferRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub discount_type: DiscountType,
    pub offer_start_date: NaiveDate,
    pub offer_end_date: NaiveDate,
    #[serde(default = "default_restriction")]
    pub order_type_restriction: OrderTypeRestriction,
    #[validate(length(min = 1, message = "Offer must cover at least one menu item"))]
    pub menu_item_ids: Vec<i32>,
    #[validate]
    pub tier_discounts: Vec<TierDiscountRequest>,
}

/// Request DTO for updating a daily offer
/// Item and tier-discount lists, when present, replace the stored sets.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOfferRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub offer_start_date: Option<NaiveDate>,
    pub offer_end_date: Option<NaiveDate>,
    pub order_type_restriction: Option<OrderTypeRestriction>,
    pub menu_item_ids: Option<Vec<i32>>,
    #[validate]
    pub tier_discounts: Option<Vec<TierDiscountRequest>>,
}

fn default_restriction() -> OrderTypeRestriction {
    OrderTypeRestriction::Both
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn offer(start: NaiveDate, end: NaiveDate) -> DailyOffer {
        DailyOffer {
            id: Uuid::new_v4(),
            title: "Morning special".to_string(),
            discount_type: DiscountType::Percentage,
            offer_start_date: start,
            offer_end_date: end,
            order_type_restriction: OrderTypeRestriction::Both,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_date_window_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let offer = offer(start, end);

        assert!(offer.is_active_on(start));
        assert!(offer.is_active_on(end));
        assert!(offer.is_active_on(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()));
        assert!(!offer.is_active_on(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!offer.is_active_on(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()));
    }

    #[test]
    fn test_restriction_permits() {
        assert!(OrderTypeRestriction::Both.permits(OrderType::DineIn));
        assert!(OrderTypeRestriction::Both.permits(OrderType::Takeaway));
        assert!(OrderTypeRestriction::DineIn.permits(OrderType::DineIn));
        assert!(!OrderTypeRestriction::DineIn.permits(OrderType::Takeaway));
        assert!(!OrderTypeRestriction::Takeaway.permits(OrderType::DineIn));
    }
}
