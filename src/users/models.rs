use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::auth::models::Role;
use crate::offers::models::DiscountType;

/// User row as shown on the admin management screens
/// (password hash never leaves the database layer)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminUserView {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub email_verified: bool,
    pub loyalty_points: i32,
    pub lifetime_points: i32,
    pub order_count: i32,
    pub date_of_birth: Option<NaiveDate>,
    pub birthday_discount_value: Option<Decimal>,
    pub birthday_discount_type: Option<String>,
    pub referral_code: String,
    pub has_linked_socials: bool,
    pub has_left_review: bool,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for changing a user's role
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Request DTO for granting a one-shot birthday discount
#[derive(Debug, Deserialize, Validate)]
pub struct GrantBirthdayDiscountRequest {
    #[validate(custom = "crate::validation::validate_non_negative_price")]
    pub value: Decimal,
    pub discount_type: DiscountType,
}
