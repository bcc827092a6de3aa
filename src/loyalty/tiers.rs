// Tier resolution
//
// Maps lifetime points onto the ordered loyalty levels and computes progress
// toward the next level. Redemption never touches lifetime points, so a
// resolved tier can only move up.

use rust_decimal::Decimal;

use crate::loyalty::models::LoyaltyLevel;

/// A user's resolved tier standing
#[derive(Debug, Clone, PartialEq)]
pub struct TierStanding {
    pub current: LoyaltyLevel,
    pub next: Option<LoyaltyLevel>,
    /// Progress toward the next tier, 0-100, 100 when at the top tier
    pub progress_percent: Decimal,
}

/// Resolve the tier for a lifetime-points balance.
///
/// `levels` may arrive in any order; they are ranked by ascending
/// `minimum_points` and the current tier is the last level whose threshold is
/// at or below `lifetime_points`. Non-negative lifetime points always qualify
/// for the lowest level. Returns None only when no levels are configured.
pub fn resolve_tier(levels: &[LoyaltyLevel], lifetime_points: i32) -> Option<TierStanding> {
    if levels.is_empty() {
        return None;
    }

    let mut ordered: Vec<LoyaltyLevel> = levels.to_vec();
    ordered.sort_by_key(|level| level.minimum_points);

    let current_index = ordered
        .iter()
        .rposition(|level| level.minimum_points <= lifetime_points)
        .unwrap_or(0);

    let current = ordered[current_index].clone();
    let next = ordered.get(current_index + 1).cloned();

    let progress_percent = match &next {
        Some(next_level) => {
            let span = Decimal::from(next_level.minimum_points - current.minimum_points);
            let gained = Decimal::from(lifetime_points - current.minimum_points);
            if span.is_zero() {
                Decimal::from(100)
            } else {
                (gained / span * Decimal::from(100))
                    .round_dp(2)
                    .clamp(Decimal::ZERO, Decimal::from(100))
            }
        }
        None => Decimal::from(100),
    };

    Some(TierStanding {
        current,
        next,
        progress_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn default_levels() -> Vec<LoyaltyLevel> {
        [
            ("Member", 0),
            ("Bronze", 100),
            ("Silver", 500),
            ("Gold", 2000),
            ("Platinum", 5000),
        ]
        .iter()
        .enumerate()
        .map(|(i, (name, min))| LoyaltyLevel {
            id: i as i32 + 1,
            name: name.to_string(),
            minimum_points: *min,
        })
        .collect()
    }

    #[test]
    fn test_gold_standing_with_progress() {
        let standing = resolve_tier(&default_levels(), 2500).unwrap();

        assert_eq!(standing.current.name, "Gold");
        assert_eq!(standing.next.as_ref().unwrap().name, "Platinum");
        // (2500 - 2000) / (5000 - 2000) * 100
        assert_eq!(standing.progress_percent, dec!(16.67));
    }

    #[test]
    fn test_zero_points_is_lowest_tier() {
        let standing = resolve_tier(&default_levels(), 0).unwrap();

        assert_eq!(standing.current.name, "Member");
        assert_eq!(standing.next.as_ref().unwrap().name, "Bronze");
        assert_eq!(standing.progress_percent, Decimal::ZERO);
    }

    #[test]
    fn test_top_tier_has_no_next() {
        let standing = resolve_tier(&default_levels(), 9000).unwrap();

        assert_eq!(standing.current.name, "Platinum");
        assert!(standing.next.is_none());
        assert_eq!(standing.progress_percent, Decimal::from(100));
    }

    #[test]
    fn test_exact_threshold_promotes() {
        let standing = resolve_tier(&default_levels(), 500).unwrap();
        assert_eq!(standing.current.name, "Silver");
    }

    #[test]
    fn test_unsorted_input_is_ranked() {
        let mut levels = default_levels();
        levels.reverse();

        let standing = resolve_tier(&levels, 150).unwrap();
        assert_eq!(standing.current.name, "Bronze");
    }

    #[test]
    fn test_empty_levels() {
        assert!(resolve_tier(&[], 100).is_none());
    }

    #[test]
    fn test_monotonic_in_lifetime_points() {
        let levels = default_levels();
        let mut last_index = 0usize;

        for points in 0..6000 {
            let standing = resolve_tier(&levels, points).unwrap();
            let index = levels
                .iter()
                .position(|l| l.name == standing.current.name)
                .unwrap();
            assert!(index >= last_index, "tier dropped at {} points", points);
            last_index = index;
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_levels() -> impl Strategy<Value = Vec<LoyaltyLevel>> {
        prop::collection::vec(0i32..100_000, 1..8).prop_map(|mut mins| {
            mins.sort_unstable();
            mins.dedup();
            mins[0] = 0;
            mins.iter()
                .enumerate()
                .map(|(i, min)| LoyaltyLevel {
                    id: i as i32 + 1,
                    name: format!("Tier {}", i),
                    minimum_points: *min,
                })
                .collect()
        })
    }

    proptest! {
        /// Increasing lifetime points never decreases the resolved tier
        #[test]
        fn prop_tier_is_monotonic(
            levels in arb_levels(),
            a in 0i32..120_000,
            b in 0i32..120_000,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

            let lo_standing = resolve_tier(&levels, lo).unwrap();
            let hi_standing = resolve_tier(&levels, hi).unwrap();

            prop_assert!(hi_standing.current.minimum_points >= lo_standing.current.minimum_points);
        }

        /// Progress stays within 0-100
        #[test]
        fn prop_progress_bounded(levels in arb_levels(), points in 0i32..120_000) {
            let standing = resolve_tier(&levels, points).unwrap();

            prop_assert!(standing.progress_percent >= Decimal::ZERO);
            prop_assert!(standing.progress_percent <= Decimal::from(100));
        }
    }
}
