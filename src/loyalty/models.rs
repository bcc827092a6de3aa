use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A loyalty tier threshold row
///
/// Levels are ordered by ascending `minimum_points`; the lowest level is the
/// base tier every account starts in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LoyaltyLevel {
    pub id: i32,
    pub name: String,
    pub minimum_points: i32,
}

/// Kind of a point transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Earn,
    Redeem,
}

/// A row of the append-only point ledger
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PointTransaction {
    pub id: i32,
    pub user_id: i32,
    pub occurred_at: DateTime<Utc>,
    pub description: String,
    /// Signed amount: positive for earn, negative for redeem
    pub amount: i32,
    pub kind: TransactionKind,
}

/// One-time rewards a customer can claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    LinkSocials,
    LeaveReview,
}

/// Request DTO for claiming a one-time reward
#[derive(Debug, Deserialize)]
pub struct ClaimRewardRequest {
    pub reward: RewardKind,
}

/// Response DTO for a reward claim
#[derive(Debug, Serialize)]
pub struct ClaimRewardResponse {
    pub reward: RewardKind,
    pub points_awarded: i32,
    pub loyalty_points: i32,
}

/// Tier description inside the loyalty summary
#[derive(Debug, Serialize)]
pub struct TierInfo {
    pub name: String,
    pub minimum_points: i32,
    pub next_tier: Option<String>,
    pub next_tier_minimum_points: Option<i32>,
    pub progress_percent: Decimal,
}

/// Response DTO for GET /api/loyalty/summary
#[derive(Debug, Serialize)]
pub struct LoyaltySummary {
    pub loyalty_points: i32,
    pub lifetime_points: i32,
    pub tier: TierInfo,
}

/// Request DTO for creating a loyalty level (admin)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLoyaltyLevelRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0, message = "Threshold must be non-negative"))]
    pub minimum_points: i32,
}

/// Request DTO for updating a loyalty level (admin)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLoyaltyLevelRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "Threshold must be non-negative"))]
    pub minimum_points: Option<i32>,
}
