// Points accrual bands
//
// A single threshold-based rate applies to the whole payable total, not a
// marginal band-by-band calculation. Larger baskets earn at a higher rate
// (0.25% up to 2%).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Calculate the loyalty points earned for a payable total.
///
/// Bands (currency units, inclusive/exclusive boundaries are load-bearing;
/// 10000 itself falls in the middle band):
/// - total > 10000:        floor(total / 100) * 2
/// - 5000 <= total <= 10000: floor(total / 100)
/// - 1000 <= total < 5000:   floor(total / 200)
/// - 0 < total < 1000:       floor(total / 400)
/// - otherwise:              0
pub fn points_for_total(total: Decimal) -> i32 {
    if total > Decimal::from(10_000) {
        floor_div(total, Decimal::from(100)) * 2
    } else if total >= Decimal::from(5_000) {
        floor_div(total, Decimal::from(100))
    } else if total >= Decimal::from(1_000) {
        floor_div(total, Decimal::from(200))
    } else if total > Decimal::ZERO {
        floor_div(total, Decimal::from(400))
    } else {
        0
    }
}

fn floor_div(total: Decimal, divisor: Decimal) -> i32 {
    (total / divisor).floor().to_i32().unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_top_band_doubles_rate() {
        // 12000 / 100 = 120, doubled
        assert_eq!(points_for_total(dec!(12000)), 240);
    }

    #[test]
    fn test_boundary_10000_is_not_top_band() {
        // Strictly-greater boundary: 10000 earns at the 1% rate
        assert_eq!(points_for_total(dec!(10000)), 100);
        assert_eq!(points_for_total(dec!(10000.01)), 200);
    }

    #[test]
    fn test_middle_band() {
        assert_eq!(points_for_total(dec!(5000)), 50);
        assert_eq!(points_for_total(dec!(7550)), 75);
    }

    #[test]
    fn test_low_band() {
        assert_eq!(points_for_total(dec!(1000)), 5);
        assert_eq!(points_for_total(dec!(4999)), 24);
    }

    #[test]
    fn test_bottom_band() {
        assert_eq!(points_for_total(dec!(800)), 2);
        assert_eq!(points_for_total(dec!(399)), 0);
        assert_eq!(points_for_total(dec!(999.99)), 2);
    }

    #[test]
    fn test_zero_and_negative() {
        assert_eq!(points_for_total(Decimal::ZERO), 0);
        assert_eq!(points_for_total(dec!(-50)), 0);
    }

    #[test]
    fn test_fractional_totals_truncate() {
        // 1099.99 / 200 = 5.49995, floored
        assert_eq!(points_for_total(dec!(1099.99)), 5);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    /// Each band computes exactly its formula over its whole range
    #[test]
    fn prop_band_formulas_hold() {
        proptest!(|(cents in 1u64..=2_000_000u64)| {
            let total = Decimal::from(cents) / Decimal::from(100);
            let points = points_for_total(total);

            let expected = if total > Decimal::from(10_000) {
                (total / Decimal::from(100)).floor() * Decimal::from(2)
            } else if total >= Decimal::from(5_000) {
                (total / Decimal::from(100)).floor()
            } else if total >= Decimal::from(1_000) {
                (total / Decimal::from(200)).floor()
            } else {
                (total / Decimal::from(400)).floor()
            };

            prop_assert_eq!(Decimal::from(points), expected);
        });
    }

    /// Points are never negative
    #[test]
    fn prop_points_non_negative() {
        proptest!(|(units in -10_000i64..=50_000i64)| {
            let total = Decimal::from(units);
            prop_assert!(points_for_total(total) >= 0);
        });
    }
}
