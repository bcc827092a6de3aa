use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents a menu category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Hot Drinks")]
    pub name: String,
    #[schema(example = 0)]
    pub display_order: i32,
}

/// Represents a menu item in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MenuItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Flat White")]
    pub name: String,
    #[schema(example = "Double ristretto with steamed milk")]
    pub description: String,
    /// Base price in currency units
    #[schema(example = 450)]
    pub price: Decimal,
    #[schema(example = 1)]
    pub category_id: i32,
    #[schema(example = "https://img.example/flat-white.jpg")]
    pub image_url: String,
    #[schema(example = false)]
    pub is_out_of_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An add-on category (e.g. "Milk", "Syrups")
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AddonCategory {
    pub id: i32,
    pub name: String,
}

/// An individual add-on
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Addon {
    pub id: i32,
    pub addon_category_id: i32,
    pub name: String,
    pub price: Decimal,
    pub is_active: bool,
    pub display_order: i32,
}

/// An add-on group declared on a menu item
///
/// References an add-on category and constrains how many selections a cart
/// line may carry from it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AddonGroup {
    pub menu_item_id: i32,
    pub addon_category_id: i32,
    pub is_required: bool,
    pub min_selection: i32,
    pub max_selection: i32,
}

/// An add-on group expanded with its category name and active add-ons,
/// as served on the item detail endpoint
#[derive(Debug, Clone, Serialize)]
pub struct AddonGroupDetail {
    pub addon_category_id: i32,
    pub addon_category_name: String,
    pub is_required: bool,
    pub min_selection: i32,
    pub max_selection: i32,
    pub addons: Vec<Addon>,
}

/// Menu item with its add-on groups, for the item detail endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemDetail {
    #[serde(flatten)]
    pub item: MenuItem,
    pub addon_groups: Vec<AddonGroupDetail>,
}

/// Declaration of one add-on group on a create/update request
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct AddonGroupRequest {
    pub addon_category_id: i32,
    #[serde(default)]
    pub is_required: bool,
    #[validate(range(min = 0, message = "min_selection must be non-negative"))]
    #[serde(default)]
    pub min_selection: i32,
    #[validate(range(min = 1, message = "max_selection must be at least 1"))]
    pub max_selection: i32,
}

/// Request DTO for creating a menu item
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateMenuItem {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[schema(example = "Flat White")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom = "crate::validation::validate_non_negative_price")]
    #[schema(example = 450)]
    pub price: Decimal,
    pub category_id: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_out_of_stock: bool,
    #[validate]
    #[serde(default)]
    pub addon_groups: Vec<AddonGroupRequest>,
}

/// Request DTO for updating a menu item
/// All fields optional to support partial updates; `addon_groups`, when
/// present, replaces the whole declaration set.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateMenuItem {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "crate::validation::validate_non_negative_price")]
    pub price: Option<Decimal>,
    pub category_id: Option<i32>,
    pub image_url: Option<String>,
    pub is_out_of_stock: Option<bool>,
    #[validate]
    pub addon_groups: Option<Vec<AddonGroupRequest>>,
}

/// Request DTO for creating/renaming a category
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
}

/// Request DTO for creating/renaming an add-on category
#[derive(Debug, Deserialize, Validate)]
pub struct AddonCategoryRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}

/// Request DTO for creating an add-on
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAddon {
    pub addon_category_id: i32,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(custom = "crate::validation::validate_non_negative_price")]
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

/// Request DTO for updating an add-on
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAddon {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(custom = "crate::validation::validate_non_negative_price")]
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_menu_item_deserialization() {
        let json = r#"{
            "name": "Flat White",
            "description": "Double ristretto with steamed milk",
            "price": 450,
            "category_id": 1,
            "addon_groups": [
                {"addon_category_id": 2, "is_required": true, "min_selection": 1, "max_selection": 1}
            ]
        }"#;

        let request: CreateMenuItem = serde_json::from_str(json).unwrap();

        assert_eq!(request.name, "Flat White");
        assert_eq!(request.price, dec!(450));
        assert!(!request.is_out_of_stock);
        assert_eq!(request.addon_groups.len(), 1);
        assert!(request.addon_groups[0].is_required);
    }

    #[test]
    fn test_update_menu_item_partial() {
        let json = r#"{"price": 500}"#;

        let request: UpdateMenuItem = serde_json::from_str(json).unwrap();

        assert_eq!(request.price, Some(dec!(500)));
        assert!(request.name.is_none());
        assert!(request.addon_groups.is_none());
    }

    #[test]
    fn test_create_addon_defaults_active() {
        let json = r#"{"addon_category_id": 1, "name": "Oat milk", "price": 60}"#;

        let request: CreateAddon = serde_json::from_str(json).unwrap();

        assert!(request.is_active);
        assert_eq!(request.display_order, 0);
    }
}
