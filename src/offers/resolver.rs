// Offer resolution for cart lines
//
// Given the offers visible to a user on a given day, picks the single offer
// applied to a menu item. Selection is deterministic: the eligible offer with
// the largest unit-price discount wins, and exact ties go to the most
// recently created offer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::offers::models::{DailyOffer, DiscountType};
use crate::orders::models::OrderType;

/// An offer as loaded for one user: the offer row, the items it covers, the
/// discount value configured for the user's tier, and whether the user has
/// already redeemed it today.
#[derive(Debug, Clone)]
pub struct OfferCandidate {
    pub offer: DailyOffer,
    pub menu_item_ids: Vec<i32>,
    pub tier_discount: Option<Decimal>,
    pub redeemed_today: bool,
}

/// The offer chosen for a cart line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedOffer {
    pub offer_id: Uuid,
    pub title: String,
    /// Item base price after the discount, floored at zero
    pub unit_price: Decimal,
    pub discount_amount: Decimal,
}

/// Compute the discounted unit price for one offer against a base price
fn discounted_unit_price(
    discount_type: DiscountType,
    value: Decimal,
    base_price: Decimal,
) -> Decimal {
    let discounted = match discount_type {
        DiscountType::Fixed => base_price - value,
        DiscountType::Percentage => base_price - base_price * value / Decimal::from(100),
    };
    discounted.max(Decimal::ZERO)
}

/// Pick the offer applied to a menu item, if any.
///
/// A candidate is eligible when its item list contains the item, its
/// inclusive date window contains `today`, its order-type restriction permits
/// the session order type, the user has not redeemed it today, and the user's
/// tier has a discount value greater than zero. At most one offer applies.
pub fn best_offer_for_item(
    menu_item_id: i32,
    base_price: Decimal,
    order_type: OrderType,
    today: NaiveDate,
    candidates: &[OfferCandidate],
) -> Option<AppliedOffer> {
    candidates
        .iter()
        .filter(|candidate| candidate.menu_item_ids.contains(&menu_item_id))
        .filter(|candidate| candidate.offer.is_active_on(today))
        .filter(|candidate| candidate.offer.order_type_restriction.permits(order_type))
        .filter(|candidate| !candidate.redeemed_today)
        .filter_map(|candidate| {
            let value = candidate.tier_discount?;
            if value <= Decimal::ZERO {
                return None;
            }

            let unit_price =
                discounted_unit_price(candidate.offer.discount_type, value, base_price);
            let discount_amount = base_price - unit_price;
            if discount_amount <= Decimal::ZERO {
                return None;
            }

            Some((candidate, unit_price, discount_amount))
        })
        .max_by(|(a, _, discount_a), (b, _, discount_b)| {
            discount_a
                .cmp(discount_b)
                .then(a.offer.created_at.cmp(&b.offer.created_at))
                .then(a.offer.id.cmp(&b.offer.id))
        })
        .map(|(candidate, unit_price, discount_amount)| AppliedOffer {
            offer_id: candidate.offer.id,
            title: candidate.offer.title.clone(),
            unit_price,
            discount_amount,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::models::OrderTypeRestriction;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn candidate(
        title: &str,
        discount_type: DiscountType,
        value: Option<Decimal>,
        created_offset_secs: i64,
    ) -> OfferCandidate {
        OfferCandidate {
            offer: DailyOffer {
                id: Uuid::new_v4(),
                title: title.to_string(),
                discount_type,
                offer_start_date: today() - Duration::days(1),
                offer_end_date: today() + Duration::days(1),
                order_type_restriction: OrderTypeRestriction::Both,
                created_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
                    + Duration::seconds(created_offset_secs),
            },
            menu_item_ids: vec![10],
            tier_discount: value,
            redeemed_today: false,
        }
    }

    #[test]
    fn test_fixed_discount_applies() {
        let candidates = vec![candidate("Fixed 50", DiscountType::Fixed, Some(dec!(50)), 0)];

        let applied =
            best_offer_for_item(10, dec!(450), OrderType::Takeaway, today(), &candidates).unwrap();

        assert_eq!(applied.unit_price, dec!(400));
        assert_eq!(applied.discount_amount, dec!(50));
    }

    #[test]
    fn test_percentage_discount_applies() {
        let candidates = vec![candidate("10% off", DiscountType::Percentage, Some(dec!(10)), 0)];

        let applied =
            best_offer_for_item(10, dec!(450), OrderType::DineIn, today(), &candidates).unwrap();

        assert_eq!(applied.unit_price, dec!(405.0));
    }

    #[test]
    fn test_largest_discount_wins() {
        let candidates = vec![
            candidate("Small", DiscountType::Fixed, Some(dec!(20)), 0),
            candidate("Big", DiscountType::Fixed, Some(dec!(80)), 0),
            candidate("Medium", DiscountType::Percentage, Some(dec!(10)), 0),
        ];

        let applied =
            best_offer_for_item(10, dec!(500), OrderType::Takeaway, today(), &candidates).unwrap();

        assert_eq!(applied.title, "Big");
        assert_eq!(applied.unit_price, dec!(420));
    }

    #[test]
    fn test_tie_goes_to_newest_offer() {
        let candidates = vec![
            candidate("Older", DiscountType::Fixed, Some(dec!(50)), 0),
            candidate("Newer", DiscountType::Fixed, Some(dec!(50)), 3600),
        ];

        let applied =
            best_offer_for_item(10, dec!(500), OrderType::Takeaway, today(), &candidates).unwrap();

        assert_eq!(applied.title, "Newer");
    }

    #[test]
    fn test_zero_or_missing_tier_value_is_skipped() {
        let candidates = vec![
            candidate("Zero", DiscountType::Fixed, Some(Decimal::ZERO), 0),
            candidate("Missing", DiscountType::Fixed, None, 0),
        ];

        assert!(
            best_offer_for_item(10, dec!(500), OrderType::Takeaway, today(), &candidates).is_none()
        );
    }

    #[test]
    fn test_redeemed_today_is_skipped() {
        let mut c = candidate("Once a day", DiscountType::Fixed, Some(dec!(50)), 0);
        c.redeemed_today = true;

        assert!(best_offer_for_item(10, dec!(500), OrderType::Takeaway, today(), &[c]).is_none());
    }

    #[test]
    fn test_order_type_restriction_filters() {
        let mut c = candidate("Dine-in only", DiscountType::Fixed, Some(dec!(50)), 0);
        c.offer.order_type_restriction = OrderTypeRestriction::DineIn;
        let candidates = vec![c];

        assert!(
            best_offer_for_item(10, dec!(500), OrderType::Takeaway, today(), &candidates).is_none()
        );
        assert!(
            best_offer_for_item(10, dec!(500), OrderType::DineIn, today(), &candidates).is_some()
        );
    }

    #[test]
    fn test_out_of_window_is_skipped() {
        let mut c = candidate("Expired", DiscountType::Fixed, Some(dec!(50)), 0);
        c.offer.offer_end_date = today() - Duration::days(2);

        assert!(best_offer_for_item(10, dec!(500), OrderType::Takeaway, today(), &[c]).is_none());
    }

    #[test]
    fn test_other_items_not_discounted() {
        let candidates = vec![candidate("Item 10 only", DiscountType::Fixed, Some(dec!(50)), 0)];

        assert!(
            best_offer_for_item(99, dec!(500), OrderType::Takeaway, today(), &candidates).is_none()
        );
    }

    #[test]
    fn test_discount_never_goes_below_zero() {
        let candidates = vec![candidate("Huge", DiscountType::Fixed, Some(dec!(9999)), 0)];

        let applied =
            best_offer_for_item(10, dec!(300), OrderType::Takeaway, today(), &candidates).unwrap();

        assert_eq!(applied.unit_price, Decimal::ZERO);
        assert_eq!(applied.discount_amount, dec!(300));
    }
}
