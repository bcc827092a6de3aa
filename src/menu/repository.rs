use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::menu::models::{
    Addon, AddonCategory, AddonGroup, AddonGroupDetail, AddonGroupRequest, Category, MenuItem,
    MenuItemDetail,
};

const MENU_ITEM_COLUMNS: &str =
    "id, name, description, price, category_id, image_url, is_out_of_stock, created_at, updated_at";

/// Repository for the menu catalog: categories, items, add-on categories,
/// add-ons, and per-item add-on group declarations.
#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    /// Create a new MenuRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ----- categories -----

    /// List categories in display order
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, display_order FROM categories ORDER BY display_order, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn create_category(
        &self,
        name: &str,
        display_order: i32,
    ) -> Result<Category, ApiError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, display_order) VALUES ($1, $2) \
             RETURNING id, name, display_order",
        )
        .bind(name)
        .bind(display_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: i32,
        name: &str,
        display_order: i32,
    ) -> Result<Category, ApiError> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $1, display_order = $2 WHERE id = $3 \
             RETURNING id, name, display_order",
        )
        .bind(name)
        .bind(display_order)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Category".to_string(),
            id: id.to_string(),
        })?;

        Ok(category)
    }

    /// Delete a category; refuses while menu items still reference it
    pub async fn delete_category(&self, id: i32) -> Result<(), ApiError> {
        let in_use: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM menu_items WHERE category_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if in_use.unwrap_or(false) {
            return Err(ApiError::Conflict {
                message: "Category still has menu items".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound {
                resource: "Category".to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }

    // ----- menu items -----

    /// Find a menu item by ID
    pub async fn find_item_by_id(&self, id: i32) -> Result<Option<MenuItem>, ApiError> {
        let sql = format!("SELECT {} FROM menu_items WHERE id = $1", MENU_ITEM_COLUMNS);

        let item = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Find multiple menu items by IDs
    pub async fn find_items_by_ids(&self, ids: &[i32]) -> Result<Vec<MenuItem>, ApiError> {
        let sql = format!(
            "SELECT {} FROM menu_items WHERE id = ANY($1)",
            MENU_ITEM_COLUMNS
        );

        let items = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Create a menu item together with its add-on group declarations
    pub async fn create_item(
        &self,
        name: &str,
        description: &str,
        price: Decimal,
        category_id: i32,
        image_url: &str,
        is_out_of_stock: bool,
        addon_groups: &[AddonGroupRequest],
    ) -> Result<MenuItem, ApiError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO menu_items (name, description, price, category_id, image_url, is_out_of_stock) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            MENU_ITEM_COLUMNS
        );

        let item = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(name)
            .bind(description)
            .bind(price)
            .bind(category_id)
            .bind(image_url)
            .bind(is_out_of_stock)
            .fetch_one(&mut *tx)
            .await?;

        for group in addon_groups {
            sqlx::query(
                "INSERT INTO menu_item_addon_groups \
                 (menu_item_id, addon_category_id, is_required, min_selection, max_selection) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(item.id)
            .bind(group.addon_category_id)
            .bind(group.is_required)
            .bind(group.min_selection)
            .bind(group.max_selection)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(item)
    }

    /// Update a menu item; when `addon_groups` is Some the declaration set is
    /// replaced wholesale inside the same transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_item(
        &self,
        id: i32,
        name: &str,
        description: &str,
        price: Decimal,
        category_id: i32,
        image_url: &str,
        is_out_of_stock: bool,
        addon_groups: Option<&[AddonGroupRequest]>,
    ) -> Result<MenuItem, ApiError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE menu_items \
             SET name = $1, description = $2, price = $3, category_id = $4, \
                 image_url = $5, is_out_of_stock = $6, updated_at = NOW() \
             WHERE id = $7 RETURNING {}",
            MENU_ITEM_COLUMNS
        );

        let item = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(name)
            .bind(description)
            .bind(price)
            .bind(category_id)
            .bind(image_url)
            .bind(is_out_of_stock)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                resource: "MenuItem".to_string(),
                id: id.to_string(),
            })?;

        if let Some(groups) = addon_groups {
            sqlx::query("DELETE FROM menu_item_addon_groups WHERE menu_item_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for group in groups {
                sqlx::query(
                    "INSERT INTO menu_item_addon_groups \
                     (menu_item_id, addon_category_id, is_required, min_selection, max_selection) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(id)
                .bind(group.addon_category_id)
                .bind(group.is_required)
                .bind(group.min_selection)
                .bind(group.max_selection)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(item)
    }

    /// Delete a menu item
    pub async fn delete_item(&self, id: i32) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound {
                resource: "MenuItem".to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }

    /// Fetch a menu item with its add-on groups and each group's active
    /// add-ons, for the item detail endpoint and cart validation.
    pub async fn item_detail(&self, id: i32) -> Result<Option<MenuItemDetail>, ApiError> {
        let item = match self.find_item_by_id(id).await? {
            Some(item) => item,
            None => return Ok(None),
        };

        let groups = self.groups_for_item(id).await?;

        let mut group_details = Vec::with_capacity(groups.len());
        for group in groups {
            let name: String =
                sqlx::query_scalar("SELECT name FROM addon_categories WHERE id = $1")
                    .bind(group.addon_category_id)
                    .fetch_one(&self.pool)
                    .await?;

            let addons = sqlx::query_as::<_, Addon>(
                "SELECT id, addon_category_id, name, price, is_active, display_order \
                 FROM addons \
                 WHERE addon_category_id = $1 AND is_active \
                 ORDER BY display_order, id",
            )
            .bind(group.addon_category_id)
            .fetch_all(&self.pool)
            .await?;

            group_details.push(AddonGroupDetail {
                addon_category_id: group.addon_category_id,
                addon_category_name: name,
                is_required: group.is_required,
                min_selection: group.min_selection,
                max_selection: group.max_selection,
                addons,
            });
        }

        Ok(Some(MenuItemDetail {
            item,
            addon_groups: group_details,
        }))
    }

    /// Add-on group declarations for a menu item
    pub async fn groups_for_item(&self, menu_item_id: i32) -> Result<Vec<AddonGroup>, ApiError> {
        let groups = sqlx::query_as::<_, AddonGroup>(
            "SELECT menu_item_id, addon_category_id, is_required, min_selection, max_selection \
             FROM menu_item_addon_groups WHERE menu_item_id = $1",
        )
        .bind(menu_item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    // ----- add-on categories -----

    pub async fn list_addon_categories(&self) -> Result<Vec<AddonCategory>, ApiError> {
        let categories = sqlx::query_as::<_, AddonCategory>(
            "SELECT id, name FROM addon_categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn create_addon_category(&self, name: &str) -> Result<AddonCategory, ApiError> {
        let category = sqlx::query_as::<_, AddonCategory>(
            "INSERT INTO addon_categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn update_addon_category(
        &self,
        id: i32,
        name: &str,
    ) -> Result<AddonCategory, ApiError> {
        let category = sqlx::query_as::<_, AddonCategory>(
            "UPDATE addon_categories SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "AddonCategory".to_string(),
            id: id.to_string(),
        })?;

        Ok(category)
    }

    /// Delete an add-on category; refuses while add-ons or menu items still
    /// reference it
    pub async fn delete_addon_category(&self, id: i32) -> Result<(), ApiError> {
        let in_use: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM addons WHERE addon_category_id = $1) \
             OR EXISTS(SELECT 1 FROM menu_item_addon_groups WHERE addon_category_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if in_use.unwrap_or(false) {
            return Err(ApiError::Conflict {
                message: "Add-on category is still referenced".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM addon_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound {
                resource: "AddonCategory".to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }

    // ----- add-ons -----

    /// List add-ons, optionally restricted to one category
    pub async fn list_addons(&self, category_id: Option<i32>) -> Result<Vec<Addon>, ApiError> {
        let addons = match category_id {
            Some(category_id) => {
                sqlx::query_as::<_, Addon>(
                    "SELECT id, addon_category_id, name, price, is_active, display_order \
                     FROM addons WHERE addon_category_id = $1 ORDER BY display_order, id",
                )
                .bind(category_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Addon>(
                    "SELECT id, addon_category_id, name, price, is_active, display_order \
                     FROM addons ORDER BY addon_category_id, display_order, id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(addons)
    }

    /// Find multiple add-ons by IDs
    pub async fn find_addons_by_ids(&self, ids: &[i32]) -> Result<Vec<Addon>, ApiError> {
        let addons = sqlx::query_as::<_, Addon>(
            "SELECT id, addon_category_id, name, price, is_active, display_order \
             FROM addons WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(addons)
    }

    pub async fn create_addon(
        &self,
        addon_category_id: i32,
        name: &str,
        price: Decimal,
        is_active: bool,
        display_order: i32,
    ) -> Result<Addon, ApiError> {
        let addon = sqlx::query_as::<_, Addon>(
            "INSERT INTO addons (addon_category_id, name, price, is_active, display_order) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, addon_category_id, name, price, is_active, display_order",
        )
        .bind(addon_category_id)
        .bind(name)
        .bind(price)
        .bind(is_active)
        .bind(display_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(addon)
    }

    pub async fn update_addon(
        &self,
        id: i32,
        name: Option<&str>,
        price: Option<Decimal>,
        is_active: Option<bool>,
        display_order: Option<i32>,
    ) -> Result<Addon, ApiError> {
        let addon = sqlx::query_as::<_, Addon>(
            "UPDATE addons \
             SET name = COALESCE($1, name), price = COALESCE($2, price), \
                 is_active = COALESCE($3, is_active), display_order = COALESCE($4, display_order) \
             WHERE id = $5 \
             RETURNING id, addon_category_id, name, price, is_active, display_order",
        )
        .bind(name)
        .bind(price)
        .bind(is_active)
        .bind(display_order)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Addon".to_string(),
            id: id.to_string(),
        })?;

        Ok(addon)
    }

    pub async fn delete_addon(&self, id: i32) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM addons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound {
                resource: "Addon".to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }
}
