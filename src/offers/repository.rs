use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::offers::error::OfferError;
use crate::offers::models::{
    CreateOfferRequest, DailyOffer, OfferDetail, TierDiscount, UpdateOfferRequest,
};
use crate::offers::resolver::OfferCandidate;

const OFFER_COLUMNS: &str =
    "id, title, discount_type, offer_start_date, offer_end_date, order_type_restriction, created_at";

/// Repository for daily offers and their item/tier-discount sets
#[derive(Clone)]
pub struct OffersRepository {
    pool: PgPool,
}

impl OffersRepository {
    /// Create a new OffersRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all offers with their item lists and tier discounts
    pub async fn list_offers(&self) -> Result<Vec<OfferDetail>, OfferError> {
        let sql = format!("SELECT {} FROM daily_offers ORDER BY created_at DESC", OFFER_COLUMNS);
        let offers = sqlx::query_as::<_, DailyOffer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        self.expand_details(offers).await
    }

    /// Fetch one offer with its item list and tier discounts
    pub async fn get_offer(&self, id: Uuid) -> Result<Option<OfferDetail>, OfferError> {
        let sql = format!("SELECT {} FROM daily_offers WHERE id = $1", OFFER_COLUMNS);
        let offer = sqlx::query_as::<_, DailyOffer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match offer {
            Some(offer) => Ok(self.expand_details(vec![offer]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Offers whose date window includes `today`
    pub async fn active_offers(&self, today: NaiveDate) -> Result<Vec<OfferDetail>, OfferError> {
        let sql = format!(
            "SELECT {} FROM daily_offers \
             WHERE offer_start_date <= $1 AND offer_end_date >= $1 \
             ORDER BY created_at DESC",
            OFFER_COLUMNS
        );
        let offers = sqlx::query_as::<_, DailyOffer>(&sql)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;

        self.expand_details(offers).await
    }

    /// Load offer candidates for pricing a user's cart: active-window offers
    /// with their item lists, the discount value for the user's tier, and the
    /// user's redeemed-today flags.
    pub async fn candidates_for_user(
        &self,
        user_id: i32,
        loyalty_level_id: i32,
        today: NaiveDate,
    ) -> Result<Vec<OfferCandidate>, OfferError> {
        let sql = format!(
            "SELECT {} FROM daily_offers \
             WHERE offer_start_date <= $1 AND offer_end_date >= $1",
            OFFER_COLUMNS
        );
        let offers = sqlx::query_as::<_, DailyOffer>(&sql)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;

        let mut candidates = Vec::with_capacity(offers.len());
        for offer in offers {
            let menu_item_ids: Vec<i32> = sqlx::query_scalar(
                "SELECT menu_item_id FROM daily_offer_items WHERE offer_id = $1",
            )
            .bind(offer.id)
            .fetch_all(&self.pool)
            .await?;

            let tier_discount: Option<Decimal> = sqlx::query_scalar(
                "SELECT value FROM daily_offer_tier_discounts \
                 WHERE offer_id = $1 AND loyalty_level_id = $2",
            )
            .bind(offer.id)
            .bind(loyalty_level_id)
            .fetch_optional(&self.pool)
            .await?;

            let redeemed_today: Option<bool> = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM daily_offer_redemptions \
                 WHERE user_id = $1 AND offer_id = $2 AND redeemed_on = $3)",
            )
            .bind(user_id)
            .bind(offer.id)
            .bind(today)
            .fetch_one(&self.pool)
            .await?;

            candidates.push(OfferCandidate {
                offer,
                menu_item_ids,
                tier_discount,
                redeemed_today: redeemed_today.unwrap_or(false),
            });
        }

        Ok(candidates)
    }

    /// Create an offer with its item list and tier discounts in a transaction
    pub async fn create_offer(&self, request: &CreateOfferRequest) -> Result<OfferDetail, OfferError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO daily_offers \
             (title, discount_type, offer_start_date, offer_end_date, order_type_restriction) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            OFFER_COLUMNS
        );

        let offer = sqlx::query_as::<_, DailyOffer>(&sql)
            .bind(&request.title)
            .bind(request.discount_type)
            .bind(request.offer_start_date)
            .bind(request.offer_end_date)
            .bind(request.order_type_restriction)
            .fetch_one(&mut *tx)
            .await?;

        for menu_item_id in &request.menu_item_ids {
            sqlx::query(
                "INSERT INTO daily_offer_items (offer_id, menu_item_id) VALUES ($1, $2)",
            )
            .bind(offer.id)
            .bind(menu_item_id)
            .execute(&mut *tx)
            .await?;
        }

        for tier in &request.tier_discounts {
            sqlx::query(
                "INSERT INTO daily_offer_tier_discounts (offer_id, loyalty_level_id, value) \
                 VALUES ($1, $2, $3)",
            )
            .bind(offer.id)
            .bind(tier.loyalty_level_id)
            .bind(tier.value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_offer(offer.id)
            .await?
            .ok_or(OfferError::NotFound)
    }

    /// Update an offer; item and tier-discount lists, when present, replace
    /// the stored sets inside the same transaction.
    pub async fn update_offer(
        &self,
        id: Uuid,
        request: &UpdateOfferRequest,
    ) -> Result<OfferDetail, OfferError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE daily_offers \
             SET title = COALESCE($1, title), \
                 discount_type = COALESCE($2, discount_type), \
                 offer_start_date = COALESCE($3, offer_start_date), \
                 offer_end_date = COALESCE($4, offer_end_date), \
                 order_type_restriction = COALESCE($5, order_type_restriction) \
             WHERE id = $6 RETURNING {}",
            OFFER_COLUMNS
        );

        let offer = sqlx::query_as::<_, DailyOffer>(&sql)
            .bind(request.title.as_deref())
            .bind(request.discount_type)
            .bind(request.offer_start_date)
            .bind(request.offer_end_date)
            .bind(request.order_type_restriction)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(OfferError::NotFound)?;

        if offer.offer_end_date < offer.offer_start_date {
            return Err(OfferError::ValidationError(
                "offer_end_date must not precede offer_start_date".to_string(),
            ));
        }

        if let Some(menu_item_ids) = &request.menu_item_ids {
            sqlx::query("DELETE FROM daily_offer_items WHERE offer_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for menu_item_id in menu_item_ids {
                sqlx::query(
                    "INSERT INTO daily_offer_items (offer_id, menu_item_id) VALUES ($1, $2)",
                )
                .bind(id)
                .bind(menu_item_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        if let Some(tier_discounts) = &request.tier_discounts {
            sqlx::query("DELETE FROM daily_offer_tier_discounts WHERE offer_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for tier in tier_discounts {
                sqlx::query(
                    "INSERT INTO daily_offer_tier_discounts (offer_id, loyalty_level_id, value) \
                     VALUES ($1, $2, $3)",
                )
                .bind(id)
                .bind(tier.loyalty_level_id)
                .bind(tier.value)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        self.get_offer(id).await?.ok_or(OfferError::NotFound)
    }

    /// Delete an offer (item and tier rows cascade)
    pub async fn delete_offer(&self, id: Uuid) -> Result<(), OfferError> {
        let result = sqlx::query("DELETE FROM daily_offers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OfferError::NotFound);
        }

        Ok(())
    }

    async fn expand_details(
        &self,
        offers: Vec<DailyOffer>,
    ) -> Result<Vec<OfferDetail>, OfferError> {
        let mut details = Vec::with_capacity(offers.len());
        for offer in offers {
            let menu_item_ids: Vec<i32> = sqlx::query_scalar(
                "SELECT menu_item_id FROM daily_offer_items WHERE offer_id = $1 ORDER BY menu_item_id",
            )
            .bind(offer.id)
            .fetch_all(&self.pool)
            .await?;

            let tier_discounts = sqlx::query_as::<_, TierDiscount>(
                "SELECT loyalty_level_id, value FROM daily_offer_tier_discounts \
                 WHERE offer_id = $1 ORDER BY loyalty_level_id",
            )
            .bind(offer.id)
            .fetch_all(&self.pool)
            .await?;

            details.push(OfferDetail {
                offer,
                menu_item_ids,
                tier_discounts,
            });
        }

        Ok(details)
    }
}
