// Loyalty module
//
// Points accrual bands, tier resolution, the append-only point-transaction
// ledger, and one-time reward claims.

pub mod error;
pub mod handlers;
pub mod models;
pub mod points;
pub mod repository;
pub mod service;
pub mod tiers;

pub use error::*;
pub use models::*;
pub use points::points_for_total;
pub use repository::LoyaltyRepository;
pub use service::LoyaltyService;
pub use tiers::{resolve_tier, TierStanding};

/// Fixed point values for manually claimed rewards
pub const REFERRAL_BONUS_POINTS: i32 = 50;
pub const LINK_SOCIALS_BONUS_POINTS: i32 = 25;
pub const LEAVE_REVIEW_BONUS_POINTS: i32 = 30;
