use sqlx::PgPool;

use crate::loyalty::error::LoyaltyError;
use crate::loyalty::models::{LoyaltyLevel, PointTransaction, RewardKind};

/// Repository for loyalty levels, balances, and the point ledger
#[derive(Clone)]
pub struct LoyaltyRepository {
    pool: PgPool,
}

impl LoyaltyRepository {
    /// Create a new LoyaltyRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all loyalty levels ordered by ascending threshold
    pub async fn list_levels(&self) -> Result<Vec<LoyaltyLevel>, LoyaltyError> {
        let levels = sqlx::query_as::<_, LoyaltyLevel>(
            "SELECT id, name, minimum_points FROM loyalty_levels ORDER BY minimum_points",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }

    /// Create a loyalty level
    pub async fn create_level(
        &self,
        name: &str,
        minimum_points: i32,
    ) -> Result<LoyaltyLevel, LoyaltyError> {
        let level = sqlx::query_as::<_, LoyaltyLevel>(
            "INSERT INTO loyalty_levels (name, minimum_points) VALUES ($1, $2) \
             RETURNING id, name, minimum_points",
        )
        .bind(name)
        .bind(minimum_points)
        .fetch_one(&self.pool)
        .await?;

        Ok(level)
    }

    /// Update a loyalty level, keeping existing values for omitted fields
    pub async fn update_level(
        &self,
        id: i32,
        name: Option<&str>,
        minimum_points: Option<i32>,
    ) -> Result<LoyaltyLevel, LoyaltyError> {
        let level = sqlx::query_as::<_, LoyaltyLevel>(
            "UPDATE loyalty_levels \
             SET name = COALESCE($1, name), minimum_points = COALESCE($2, minimum_points) \
             WHERE id = $3 \
             RETURNING id, name, minimum_points",
        )
        .bind(name)
        .bind(minimum_points)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LoyaltyError::LevelNotFound)?;

        Ok(level)
    }

    /// Delete a loyalty level
    pub async fn delete_level(&self, id: i32) -> Result<(), LoyaltyError> {
        let result = sqlx::query("DELETE FROM loyalty_levels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LoyaltyError::LevelNotFound);
        }

        Ok(())
    }

    /// Fetch a user's redeemable and lifetime balances
    pub async fn get_balances(&self, user_id: i32) -> Result<(i32, i32), LoyaltyError> {
        let row: Option<(i32, i32)> = sqlx::query_as(
            "SELECT loyalty_points, lifetime_points FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(LoyaltyError::UserNotFound)
    }

    /// Credit points to both the redeemable balance and the lifetime counter,
    /// appending an earn row to the ledger in the same transaction.
    pub async fn credit_points(
        &self,
        user_id: i32,
        points: i32,
        description: &str,
    ) -> Result<(), LoyaltyError> {
        if points <= 0 {
            return Err(LoyaltyError::ValidationError(
                "credit amount must be positive".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE users \
             SET loyalty_points = loyalty_points + $1, lifetime_points = lifetime_points + $1 \
             WHERE id = $2",
        )
        .bind(points)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(LoyaltyError::UserNotFound);
        }

        sqlx::query(
            "INSERT INTO point_transactions (user_id, description, amount, kind) \
             VALUES ($1, $2, $3, 'earn')",
        )
        .bind(user_id)
        .bind(description)
        .bind(points)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Credited {} points to user {}: {}", points, user_id, description);
        Ok(())
    }

    /// Claim a one-time reward by flipping its profile flag.
    ///
    /// The UPDATE only matches while the flag is still unset, which makes the
    /// claim idempotent-on-conflict: a second claim matches zero rows and is
    /// reported as already claimed. The point credit rides the same
    /// transaction as the flag flip.
    pub async fn claim_one_shot_reward(
        &self,
        user_id: i32,
        reward: RewardKind,
        points: i32,
        description: &str,
    ) -> Result<i32, LoyaltyError> {
        let flag_column = match reward {
            RewardKind::LinkSocials => "has_linked_socials",
            RewardKind::LeaveReview => "has_left_review",
        };

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE users SET {flag} = TRUE, \
             loyalty_points = loyalty_points + $1, lifetime_points = lifetime_points + $1 \
             WHERE id = $2 AND {flag} = FALSE \
             RETURNING loyalty_points",
            flag = flag_column
        );

        let new_balance: Option<i32> = sqlx::query_scalar(&sql)
            .bind(points)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let new_balance = match new_balance {
            Some(balance) => balance,
            None => {
                // Distinguish "missing user" from "already claimed"
                let exists: (bool,) =
                    sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                        .bind(user_id)
                        .fetch_one(&mut *tx)
                        .await?;
                return if exists.0 {
                    Err(LoyaltyError::RewardAlreadyClaimed)
                } else {
                    Err(LoyaltyError::UserNotFound)
                };
            }
        };

        sqlx::query(
            "INSERT INTO point_transactions (user_id, description, amount, kind) \
             VALUES ($1, $2, $3, 'earn')",
        )
        .bind(user_id)
        .bind(description)
        .bind(points)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(new_balance)
    }

    /// List a user's point transactions, newest first
    pub async fn list_transactions(
        &self,
        user_id: i32,
    ) -> Result<Vec<PointTransaction>, LoyaltyError> {
        let transactions = sqlx::query_as::<_, PointTransaction>(
            "SELECT id, user_id, occurred_at, description, amount, kind \
             FROM point_transactions \
             WHERE user_id = $1 \
             ORDER BY occurred_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}
