// Cart line validation and server-side pricing
//
// Prices always come from the catalog, never from the client. Each line is
// validated against its menu item's add-on group declarations before any
// pricing happens, and the best eligible daily offer for the user's tier is
// baked into the unit price.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::auth::models::User;
use crate::checkout::error::CheckoutError;
use crate::checkout::models::{CartLineRequest, PricedAddon, PricedLine};
use crate::loyalty::{repository::LoyaltyRepository, tiers::resolve_tier};
use crate::menu::models::{Addon, AddonGroup, MenuItem};
use crate::menu::repository::MenuRepository;
use crate::offers::repository::OffersRepository;
use crate::offers::resolver::{best_offer_for_item, OfferCandidate};
use crate::orders::models::OrderType;

/// Validates and prices cart lines for a user
#[derive(Clone)]
pub struct CartPricer {
    menu_repo: MenuRepository,
    offers_repo: OffersRepository,
    loyalty_repo: LoyaltyRepository,
}

impl CartPricer {
    /// Create a new CartPricer
    pub fn new(
        menu_repo: MenuRepository,
        offers_repo: OffersRepository,
        loyalty_repo: LoyaltyRepository,
    ) -> Self {
        Self {
            menu_repo,
            offers_repo,
            loyalty_repo,
        }
    }

    /// Validate and price a set of cart lines.
    ///
    /// Loads the user's offer candidates once (their tier's discount values
    /// and today's redemption state) and applies them per line.
    pub async fn price_lines(
        &self,
        user: &User,
        order_type: OrderType,
        today: NaiveDate,
        lines: &[CartLineRequest],
    ) -> Result<Vec<PricedLine>, CheckoutError> {
        if lines.is_empty() {
            return Err(CheckoutError::ValidationError(
                "Cart must contain at least one item".to_string(),
            ));
        }

        for line in lines {
            if line.quantity <= 0 {
                return Err(CheckoutError::InvalidQuantity(format!(
                    "Quantity must be positive, got {}",
                    line.quantity
                )));
            }
        }

        // Fetch all referenced menu items in one round trip
        let item_ids: Vec<i32> = lines.iter().map(|line| line.menu_item_id).collect();
        let items = self.menu_repo.find_items_by_ids(&item_ids).await?;
        let item_map: HashMap<i32, MenuItem> =
            items.into_iter().map(|item| (item.id, item)).collect();

        let candidates = self.offer_candidates_for(user, today).await?;

        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let item = item_map
                .get(&line.menu_item_id)
                .ok_or(CheckoutError::MenuItemNotFound(line.menu_item_id))?;

            if item.is_out_of_stock {
                return Err(CheckoutError::ItemOutOfStock(item.name.clone()));
            }

            let addons = self.validate_addons(item, &line.addon_ids).await?;
            let addon_total: Decimal = addons.iter().map(|addon| addon.price).sum();

            let applied_offer =
                best_offer_for_item(item.id, item.price, order_type, today, &candidates);

            let item_price = applied_offer
                .as_ref()
                .map(|offer| offer.unit_price)
                .unwrap_or(item.price);

            let unit_price = item_price + addon_total;
            let line_total = unit_price * Decimal::from(line.quantity);

            priced.push(PricedLine {
                menu_item_id: item.id,
                name: item.name.clone(),
                base_price: item.price,
                addons,
                quantity: line.quantity,
                unit_price,
                line_total,
                applied_offer,
            });
        }

        Ok(priced)
    }

    /// Load the daily-offer candidates visible to this user today
    async fn offer_candidates_for(
        &self,
        user: &User,
        today: NaiveDate,
    ) -> Result<Vec<OfferCandidate>, CheckoutError> {
        let levels = self.loyalty_repo.list_levels().await?;
        let standing = resolve_tier(&levels, user.lifetime_points)
            .ok_or(CheckoutError::NoLevelsConfigured)?;

        let candidates = self
            .offers_repo
            .candidates_for_user(user.id, standing.current.id, today)
            .await?;

        Ok(candidates)
    }

    /// Validate a line's add-on selections against the item's declared
    /// add-on groups and return the priced snapshots.
    async fn validate_addons(
        &self,
        item: &MenuItem,
        addon_ids: &[i32],
    ) -> Result<Vec<PricedAddon>, CheckoutError> {
        let groups = self.menu_repo.groups_for_item(item.id).await?;

        let addons = if addon_ids.is_empty() {
            Vec::new()
        } else {
            let found = self.menu_repo.find_addons_by_ids(addon_ids).await?;
            let found_map: HashMap<i32, Addon> =
                found.into_iter().map(|addon| (addon.id, addon)).collect();

            let mut resolved = Vec::with_capacity(addon_ids.len());
            for addon_id in addon_ids {
                let addon = found_map
                    .get(addon_id)
                    .filter(|addon| addon.is_active)
                    .ok_or(CheckoutError::AddonNotFound(*addon_id))?;
                resolved.push(addon.clone());
            }
            resolved
        };

        check_group_constraints(item, &groups, &addons)?;

        Ok(addons
            .into_iter()
            .map(|addon| PricedAddon {
                addon_id: addon.id,
                name: addon.name,
                price: addon.price,
            })
            .collect())
    }
}

/// Enforce the add-on group constraints for one line.
///
/// Every chosen add-on must belong to a declared group. Required groups need
/// at least one pick (or their configured minimum, whichever is higher);
/// optional groups may be skipped entirely but once picked must reach their
/// minimum. No group may exceed its maximum.
fn check_group_constraints(
    item: &MenuItem,
    groups: &[AddonGroup],
    addons: &[Addon],
) -> Result<(), CheckoutError> {
    let declared: HashMap<i32, &AddonGroup> = groups
        .iter()
        .map(|group| (group.addon_category_id, group))
        .collect();

    for addon in addons {
        if !declared.contains_key(&addon.addon_category_id) {
            return Err(CheckoutError::AddonNotAllowed {
                addon_id: addon.id,
                menu_item_id: item.id,
            });
        }
    }

    for group in groups {
        let count = addons
            .iter()
            .filter(|addon| addon.addon_category_id == group.addon_category_id)
            .count() as i32;

        if group.is_required {
            let minimum = group.min_selection.max(1);
            if count < minimum {
                return Err(CheckoutError::AddonSelectionInvalid(format!(
                    "'{}' requires at least {} selection(s) from group {}",
                    item.name, minimum, group.addon_category_id
                )));
            }
        } else if count > 0 && count < group.min_selection {
            return Err(CheckoutError::AddonSelectionInvalid(format!(
                "group {} needs at least {} selection(s) once used",
                group.addon_category_id, group.min_selection
            )));
        }

        if count > group.max_selection {
            return Err(CheckoutError::AddonSelectionInvalid(format!(
                "group {} allows at most {} selection(s)",
                group.addon_category_id, group.max_selection
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn item() -> MenuItem {
        MenuItem {
            id: 1,
            name: "Iced Latte".to_string(),
            description: String::new(),
            price: dec!(400),
            category_id: 1,
            image_url: String::new(),
            is_out_of_stock: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn group(category: i32, required: bool, min: i32, max: i32) -> AddonGroup {
        AddonGroup {
            menu_item_id: 1,
            addon_category_id: category,
            is_required: required,
            min_selection: min,
            max_selection: max,
        }
    }

    fn addon(id: i32, category: i32) -> Addon {
        Addon {
            id,
            addon_category_id: category,
            name: format!("Addon {}", id),
            price: dec!(50),
            is_active: true,
            display_order: 0,
        }
    }

    #[test]
    fn test_required_group_blocks_empty_selection() {
        let groups = vec![group(10, true, 1, 2)];

        let result = check_group_constraints(&item(), &groups, &[]);
        assert!(matches!(
            result,
            Err(CheckoutError::AddonSelectionInvalid(_))
        ));
    }

    #[test]
    fn test_required_group_satisfied() {
        let groups = vec![group(10, true, 1, 2)];
        let addons = vec![addon(100, 10)];

        assert!(check_group_constraints(&item(), &groups, &addons).is_ok());
    }

    #[test]
    fn test_max_selection_enforced() {
        let groups = vec![group(10, false, 0, 1)];
        let addons = vec![addon(100, 10), addon(101, 10)];

        let result = check_group_constraints(&item(), &groups, &addons);
        assert!(matches!(
            result,
            Err(CheckoutError::AddonSelectionInvalid(_))
        ));
    }

    #[test]
    fn test_undeclared_addon_rejected() {
        let groups = vec![group(10, false, 0, 2)];
        let addons = vec![addon(200, 99)];

        let result = check_group_constraints(&item(), &groups, &addons);
        assert!(matches!(result, Err(CheckoutError::AddonNotAllowed { .. })));
    }

    #[test]
    fn test_optional_group_may_be_skipped() {
        let groups = vec![group(10, false, 2, 4)];

        assert!(check_group_constraints(&item(), &groups, &[]).is_ok());
    }

    #[test]
    fn test_optional_group_minimum_once_used() {
        let groups = vec![group(10, false, 2, 4)];
        let addons = vec![addon(100, 10)];

        let result = check_group_constraints(&item(), &groups, &addons);
        assert!(matches!(
            result,
            Err(CheckoutError::AddonSelectionInvalid(_))
        ));
    }
}
