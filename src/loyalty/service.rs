// Loyalty service - business logic layer

use crate::loyalty::{
    error::LoyaltyError,
    models::{ClaimRewardResponse, LoyaltySummary, RewardKind, TierInfo},
    repository::LoyaltyRepository,
    tiers::resolve_tier,
    LEAVE_REVIEW_BONUS_POINTS, LINK_SOCIALS_BONUS_POINTS,
};

/// Service for loyalty summaries and reward claims
#[derive(Clone)]
pub struct LoyaltyService {
    repo: LoyaltyRepository,
}

impl LoyaltyService {
    /// Create a new LoyaltyService
    pub fn new(repo: LoyaltyRepository) -> Self {
        Self { repo }
    }

    /// Build the loyalty summary for a user: balances, current tier, and
    /// progress toward the next tier.
    pub async fn summary(&self, user_id: i32) -> Result<LoyaltySummary, LoyaltyError> {
        let (loyalty_points, lifetime_points) = self.repo.get_balances(user_id).await?;
        let levels = self.repo.list_levels().await?;

        let standing =
            resolve_tier(&levels, lifetime_points).ok_or(LoyaltyError::NoLevelsConfigured)?;

        Ok(LoyaltySummary {
            loyalty_points,
            lifetime_points,
            tier: TierInfo {
                name: standing.current.name,
                minimum_points: standing.current.minimum_points,
                next_tier: standing.next.as_ref().map(|l| l.name.clone()),
                next_tier_minimum_points: standing.next.as_ref().map(|l| l.minimum_points),
                progress_percent: standing.progress_percent,
            },
        })
    }

    /// Claim a one-time reward (link socials / leave review)
    pub async fn claim_reward(
        &self,
        user_id: i32,
        reward: RewardKind,
    ) -> Result<ClaimRewardResponse, LoyaltyError> {
        let (points, description) = match reward {
            RewardKind::LinkSocials => (LINK_SOCIALS_BONUS_POINTS, "Linked social accounts"),
            RewardKind::LeaveReview => (LEAVE_REVIEW_BONUS_POINTS, "Left a review"),
        };

        let loyalty_points = self
            .repo
            .claim_one_shot_reward(user_id, reward, points, description)
            .await?;

        tracing::info!(
            "User {} claimed reward {:?} for {} points",
            user_id,
            reward,
            points
        );

        Ok(ClaimRewardResponse {
            reward,
            points_awarded: points,
            loyalty_points,
        })
    }
}
