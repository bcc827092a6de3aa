// Checkout pricing pipeline
//
// Pure functions over immutable inputs: discount resolution (welcome and
// birthday, stacked additively over a subtotal that already carries any
// daily-offer discounts), the dine-in service charge, and redemption capping.
// All I/O stays in the cart pricer and the order service.

use rust_decimal::Decimal;

use crate::checkout::error::CheckoutError;
use crate::checkout::models::{CheckoutQuote, PricedLine};
use crate::loyalty::points_for_total;
use crate::offers::models::DiscountType;
use crate::orders::models::OrderType;

/// Service charge rate applied to dine-in orders
const SERVICE_CHARGE_RATE: (i64, u32) = (10, 2); // 0.10

/// Welcome discount percentages keyed by order count
const WELCOME_DISCOUNT_TABLE: [(i32, i64); 3] = [(0, 10), (1, 5), (2, 15)];

/// The profile fields the discount resolver reads
#[derive(Debug, Clone, Default)]
pub struct ProfileSnapshot {
    pub order_count: i32,
    pub email_verified: bool,
    pub birthday_discount_value: Option<Decimal>,
    pub birthday_discount_type: Option<DiscountType>,
}

/// The three discount amounts and the resulting subtotal
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountBreakdown {
    pub welcome_discount: Decimal,
    pub birthday_discount: Decimal,
    pub discounted_subtotal: Decimal,
}

/// Welcome discount percent for an order count, if still eligible.
///
/// The table covers order counts 0 through 2; from the third order on the
/// welcome offer is permanently unavailable.
pub fn welcome_discount_percent(order_count: i32) -> Option<Decimal> {
    WELCOME_DISCOUNT_TABLE
        .iter()
        .find(|(count, _)| *count == order_count)
        .map(|(_, percent)| Decimal::from(*percent))
}

/// Welcome discount amount for a subtotal.
/// Requires a verified email and fewer than three prior welcome consumptions.
pub fn welcome_discount(subtotal: Decimal, profile: &ProfileSnapshot) -> Decimal {
    if !profile.email_verified || subtotal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    match welcome_discount_percent(profile.order_count) {
        Some(percent) => subtotal * percent / Decimal::from(100),
        None => Decimal::ZERO,
    }
}

/// Birthday discount amount for a subtotal.
/// One-shot and admin-granted; percentage values scale the subtotal, fixed
/// values apply as-is.
pub fn birthday_discount(subtotal: Decimal, profile: &ProfileSnapshot) -> Decimal {
    if subtotal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    match (profile.birthday_discount_value, profile.birthday_discount_type) {
        (Some(value), Some(DiscountType::Percentage)) => {
            subtotal * value / Decimal::from(100)
        }
        (Some(value), Some(DiscountType::Fixed)) => value,
        _ => Decimal::ZERO,
    }
}

/// Resolve the discounts over a subtotal.
///
/// Daily-offer discounts are already embedded in the line totals that formed
/// the subtotal and never stack again here. Birthday and welcome amounts
/// stack additively and the result never goes negative.
pub fn resolve_discounts(subtotal: Decimal, profile: &ProfileSnapshot) -> DiscountBreakdown {
    let welcome = welcome_discount(subtotal, profile);
    let birthday = birthday_discount(subtotal, profile);

    let discounted_subtotal = (subtotal - birthday - welcome).max(Decimal::ZERO);

    DiscountBreakdown {
        welcome_discount: welcome,
        birthday_discount: birthday,
        discounted_subtotal,
    }
}

/// Service charge: a flat 10% surcharge on dine-in orders, nothing otherwise
pub fn service_charge(discounted_subtotal: Decimal, order_type: OrderType) -> Decimal {
    match order_type {
        OrderType::DineIn => {
            discounted_subtotal * Decimal::new(SERVICE_CHARGE_RATE.0, SERVICE_CHARGE_RATE.1)
        }
        OrderType::Takeaway => Decimal::ZERO,
    }
}

/// Validate a points redemption against the balance and the payable total.
/// 1 point knocks 1 currency unit off the charge.
pub fn validate_redemption(
    requested: i32,
    balance: i32,
    cart_total: Decimal,
) -> Result<i32, CheckoutError> {
    if requested < 0 {
        return Err(CheckoutError::InvalidRedemption(
            "points to redeem must not be negative".to_string(),
        ));
    }
    if requested > balance {
        return Err(CheckoutError::InvalidRedemption(format!(
            "cannot redeem {} points with a balance of {}",
            requested, balance
        )));
    }
    if Decimal::from(requested) > cart_total {
        return Err(CheckoutError::InvalidRedemption(format!(
            "cannot redeem {} points against a total of {}",
            requested, cart_total
        )));
    }

    Ok(requested)
}

/// Assemble the full checkout quote from priced lines and the profile
/// snapshot. Points to earn are computed from the amount actually paid.
pub fn build_quote(
    lines: Vec<PricedLine>,
    profile: &ProfileSnapshot,
    order_type: OrderType,
    points_to_redeem: i32,
    points_balance: i32,
) -> Result<CheckoutQuote, CheckoutError> {
    let subtotal: Decimal = lines.iter().map(|line| line.line_total).sum();

    let discounts = resolve_discounts(subtotal, profile);
    let charge = service_charge(discounts.discounted_subtotal, order_type);
    let cart_total = discounts.discounted_subtotal + charge;

    let points_redeemed = validate_redemption(points_to_redeem, points_balance, cart_total)?;
    let amount_due = cart_total - Decimal::from(points_redeemed);

    let points_to_earn = points_for_total(amount_due);

    Ok(CheckoutQuote {
        welcome_consumed: discounts.welcome_discount > Decimal::ZERO,
        birthday_consumed: discounts.birthday_discount > Decimal::ZERO,
        discount_applied: subtotal - discounts.discounted_subtotal,
        subtotal,
        welcome_discount: discounts.welcome_discount,
        birthday_discount: discounts.birthday_discount,
        discounted_subtotal: discounts.discounted_subtotal,
        service_charge: charge,
        cart_total,
        points_redeemed,
        amount_due,
        points_to_earn,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn verified_profile(order_count: i32) -> ProfileSnapshot {
        ProfileSnapshot {
            order_count,
            email_verified: true,
            ..Default::default()
        }
    }

    fn line(total: Decimal) -> PricedLine {
        PricedLine {
            menu_item_id: 1,
            name: "Flat White".to_string(),
            base_price: total,
            addons: vec![],
            quantity: 1,
            unit_price: total,
            line_total: total,
            applied_offer: None,
        }
    }

    #[test]
    fn test_welcome_table() {
        assert_eq!(welcome_discount_percent(0), Some(dec!(10)));
        assert_eq!(welcome_discount_percent(1), Some(dec!(5)));
        assert_eq!(welcome_discount_percent(2), Some(dec!(15)));
        assert_eq!(welcome_discount_percent(3), None);
        assert_eq!(welcome_discount_percent(7), None);
    }

    #[test]
    fn test_welcome_requires_verified_email() {
        let mut profile = verified_profile(0);
        profile.email_verified = false;

        assert_eq!(welcome_discount(dec!(1000), &profile), Decimal::ZERO);
    }

    #[test]
    fn test_first_order_welcome_scenario() {
        // subtotal 1000, order_count 0, verified, takeaway
        let quote = build_quote(
            vec![line(dec!(1000))],
            &verified_profile(0),
            OrderType::Takeaway,
            0,
            0,
        )
        .unwrap();

        assert_eq!(quote.welcome_discount, dec!(100.0));
        assert_eq!(quote.service_charge, Decimal::ZERO);
        assert_eq!(quote.cart_total, dec!(900.0));
    }

    #[test]
    fn test_dine_in_service_charge_scenario() {
        // subtotal 2000, dine-in, no discounts
        let quote = build_quote(
            vec![line(dec!(2000))],
            &ProfileSnapshot::default(),
            OrderType::DineIn,
            0,
            0,
        )
        .unwrap();

        assert_eq!(quote.service_charge, dec!(200.00));
        assert_eq!(quote.cart_total, dec!(2200.00));
    }

    #[test]
    fn test_birthday_fixed_discount() {
        let profile = ProfileSnapshot {
            birthday_discount_value: Some(dec!(300)),
            birthday_discount_type: Some(DiscountType::Fixed),
            ..Default::default()
        };

        let breakdown = resolve_discounts(dec!(1000), &profile);

        assert_eq!(breakdown.birthday_discount, dec!(300));
        assert_eq!(breakdown.discounted_subtotal, dec!(700));
    }

    #[test]
    fn test_birthday_percentage_discount() {
        let profile = ProfileSnapshot {
            birthday_discount_value: Some(dec!(25)),
            birthday_discount_type: Some(DiscountType::Percentage),
            ..Default::default()
        };

        let breakdown = resolve_discounts(dec!(1000), &profile);

        assert_eq!(breakdown.birthday_discount, dec!(250));
        assert_eq!(breakdown.discounted_subtotal, dec!(750));
    }

    #[test]
    fn test_discounts_stack_additively() {
        let profile = ProfileSnapshot {
            order_count: 0,
            email_verified: true,
            birthday_discount_value: Some(dec!(200)),
            birthday_discount_type: Some(DiscountType::Fixed),
        };

        let breakdown = resolve_discounts(dec!(1000), &profile);

        // 1000 - 200 (birthday) - 100 (welcome 10%)
        assert_eq!(breakdown.discounted_subtotal, dec!(700.0));
    }

    #[test]
    fn test_discounted_subtotal_never_negative() {
        let profile = ProfileSnapshot {
            birthday_discount_value: Some(dec!(5000)),
            birthday_discount_type: Some(DiscountType::Fixed),
            ..Default::default()
        };

        let breakdown = resolve_discounts(dec!(400), &profile);

        assert_eq!(breakdown.discounted_subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_zero_subtotal_floors_all_discounts() {
        let profile = ProfileSnapshot {
            order_count: 0,
            email_verified: true,
            birthday_discount_value: Some(dec!(500)),
            birthday_discount_type: Some(DiscountType::Fixed),
        };

        let breakdown = resolve_discounts(Decimal::ZERO, &profile);

        assert_eq!(breakdown.welcome_discount, Decimal::ZERO);
        assert_eq!(breakdown.birthday_discount, Decimal::ZERO);
        assert_eq!(breakdown.discounted_subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_redemption_caps() {
        assert_eq!(validate_redemption(0, 100, dec!(500)).unwrap(), 0);
        assert_eq!(validate_redemption(100, 100, dec!(500)).unwrap(), 100);
        assert!(validate_redemption(101, 100, dec!(500)).is_err());
        assert!(validate_redemption(600, 1000, dec!(500)).is_err());
        assert!(validate_redemption(-1, 100, dec!(500)).is_err());
    }

    #[test]
    fn test_redemption_reduces_amount_due_and_points() {
        let quote = build_quote(
            vec![line(dec!(1500))],
            &ProfileSnapshot::default(),
            OrderType::Takeaway,
            500,
            800,
        )
        .unwrap();

        assert_eq!(quote.cart_total, dec!(1500));
        assert_eq!(quote.points_redeemed, 500);
        assert_eq!(quote.amount_due, dec!(1000));
        // Points earn on what was actually paid: floor(1000 / 200)
        assert_eq!(quote.points_to_earn, 5);
    }

    #[test]
    fn test_quote_consumption_flags() {
        let quote = build_quote(
            vec![line(dec!(1000))],
            &verified_profile(2),
            OrderType::Takeaway,
            0,
            0,
        )
        .unwrap();
        assert!(quote.welcome_consumed);
        assert!(!quote.birthday_consumed);

        let quote = build_quote(
            vec![line(dec!(1000))],
            &verified_profile(3),
            OrderType::Takeaway,
            0,
            0,
        )
        .unwrap();
        assert!(!quote.welcome_consumed);
    }

    #[test]
    fn test_discount_applied_is_effective_amount() {
        let profile = ProfileSnapshot {
            birthday_discount_value: Some(dec!(5000)),
            birthday_discount_type: Some(DiscountType::Fixed),
            ..Default::default()
        };

        let quote = build_quote(
            vec![line(dec!(400))],
            &profile,
            OrderType::Takeaway,
            0,
            0,
        )
        .unwrap();

        // The raw discount exceeds the subtotal; only 400 was actually taken off
        assert_eq!(quote.discount_applied, dec!(400));
        assert_eq!(quote.cart_total, Decimal::ZERO);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    /// discounted_subtotal == max(0, subtotal - birthday - welcome)
    #[test]
    fn prop_discount_combination_rule() {
        proptest!(|(
            subtotal_units in 0i64..100_000,
            birthday_units in 0i64..50_000,
        )| {
            let subtotal = Decimal::from(subtotal_units);
            let profile = ProfileSnapshot {
                order_count: 0,
                email_verified: true,
                birthday_discount_value: Some(Decimal::from(birthday_units)),
                birthday_discount_type: Some(DiscountType::Fixed),
            };

            let breakdown = resolve_discounts(subtotal, &profile);
            let expected = (subtotal - breakdown.birthday_discount - breakdown.welcome_discount)
                .max(Decimal::ZERO);

            prop_assert_eq!(breakdown.discounted_subtotal, expected);
            prop_assert!(breakdown.discounted_subtotal >= Decimal::ZERO);
        });
    }

    /// Service charge is zero unless dine-in, where it is exactly 10%
    #[test]
    fn prop_service_charge_rule() {
        proptest!(|(units in 0i64..1_000_000, dine_in in any::<bool>())| {
            let discounted = Decimal::from(units);
            let order_type = if dine_in { OrderType::DineIn } else { OrderType::Takeaway };

            let charge = service_charge(discounted, order_type);

            if dine_in {
                prop_assert_eq!(charge, discounted * Decimal::new(10, 2));
            } else {
                prop_assert_eq!(charge, Decimal::ZERO);
            }
        });
    }

    /// Welcome eligibility is exactly {order_count in [0,2]} AND email_verified
    #[test]
    fn prop_welcome_eligibility() {
        proptest!(|(order_count in 0i32..20, verified in any::<bool>())| {
            let profile = ProfileSnapshot {
                order_count,
                email_verified: verified,
                ..Default::default()
            };

            let amount = welcome_discount(Decimal::from(1000), &profile);
            let eligible = (0..=2).contains(&order_count) && verified;

            prop_assert_eq!(amount > Decimal::ZERO, eligible);
        });
    }
}
