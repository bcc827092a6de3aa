use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::checkout::models::CheckoutQuote;
use crate::orders::error::OrderError;
use crate::orders::models::{Order, OrderItem, OrderItemAddon, OrderStatus, OrderType, PaymentStatus};

const ORDER_COLUMNS: &str =
    "id, user_id, status, payment_status, order_type, table_number, subtotal, discount_applied, \
     service_charge, total_amount, points_redeemed, points_earned, payment_ref, created_at, updated_at";

/// Repository for order persistence and the settlement transaction
#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    /// Create a new OrdersRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Settle a confirmed order in a single transaction.
    ///
    /// Everything the confirmation implies happens atomically: the order row
    /// and its denormalized item/add-on snapshots are written, the redeemable
    /// balance is decremented by the redemption, accrued points are credited
    /// to both counters, the welcome order counter and one-shot birthday
    /// fields are adjusted when consumed, every distinct applied offer is
    /// marked redeemed for today, and the ledger rows are appended. If any
    /// step fails the whole settlement rolls back and the order was never
    /// placed.
    pub async fn settle(
        &self,
        user_id: i32,
        quote: &CheckoutQuote,
        order_type: OrderType,
        table_number: Option<i32>,
        payment_ref: Option<&str>,
        today: NaiveDate,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO orders \
             (user_id, status, payment_status, order_type, table_number, subtotal, \
              discount_applied, service_charge, total_amount, points_redeemed, points_earned, \
              payment_ref) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {}",
            ORDER_COLUMNS
        );

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(user_id)
            .bind(OrderStatus::Pending)
            .bind(PaymentStatus::Paid)
            .bind(order_type)
            .bind(table_number)
            .bind(quote.subtotal)
            .bind(quote.discount_applied)
            .bind(quote.service_charge)
            .bind(quote.amount_due)
            .bind(quote.points_redeemed)
            .bind(quote.points_to_earn)
            .bind(payment_ref)
            .fetch_one(&mut *tx)
            .await?;

        for line in &quote.lines {
            let order_item_id: i32 = sqlx::query_scalar(
                "INSERT INTO order_items \
                 (order_id, menu_item_id, name, base_price, quantity, unit_price, line_total, \
                  applied_daily_offer_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
            )
            .bind(order.id)
            .bind(line.menu_item_id)
            .bind(&line.name)
            .bind(line.base_price)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.line_total)
            .bind(line.applied_offer_id())
            .fetch_one(&mut *tx)
            .await?;

            for addon in &line.addons {
                sqlx::query(
                    "INSERT INTO order_item_addons (order_item_id, addon_id, name, price) \
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(order_item_id)
                .bind(addon.addon_id)
                .bind(&addon.name)
                .bind(addon.price)
                .execute(&mut *tx)
                .await?;
            }
        }

        // Redemption decrements only the redeemable balance, never lifetime.
        // The guard in the WHERE clause makes a stale balance roll the whole
        // settlement back instead of going negative.
        if quote.points_redeemed > 0 {
            let updated = sqlx::query(
                "UPDATE users SET loyalty_points = loyalty_points - $1 \
                 WHERE id = $2 AND loyalty_points >= $1",
            )
            .bind(quote.points_redeemed)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(OrderError::InsufficientPoints);
            }

            sqlx::query(
                "INSERT INTO point_transactions (user_id, description, amount, kind) \
                 VALUES ($1, $2, $3, 'redeem')",
            )
            .bind(user_id)
            .bind(format!("Redeemed on order {}", order.id))
            .bind(-quote.points_redeemed)
            .execute(&mut *tx)
            .await?;
        }

        // Accrual credits both counters at settlement
        if quote.points_to_earn > 0 {
            sqlx::query(
                "UPDATE users \
                 SET loyalty_points = loyalty_points + $1, lifetime_points = lifetime_points + $1 \
                 WHERE id = $2",
            )
            .bind(quote.points_to_earn)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO point_transactions (user_id, description, amount, kind) \
                 VALUES ($1, $2, $3, 'earn')",
            )
            .bind(user_id)
            .bind(format!("Earned on order {}", order.id))
            .bind(quote.points_to_earn)
            .execute(&mut *tx)
            .await?;
        }

        // order_count tracks welcome-offer consumptions
        if quote.welcome_consumed {
            sqlx::query("UPDATE users SET order_count = order_count + 1 WHERE id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        // Birthday discount is one-shot
        if quote.birthday_consumed {
            sqlx::query(
                "UPDATE users \
                 SET birthday_discount_value = NULL, birthday_discount_type = NULL \
                 WHERE id = $1",
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        // Each distinct applied offer is marked redeemed for today; the
        // primary key makes a same-day duplicate a no-op.
        let offer_ids: HashSet<Uuid> = quote
            .lines
            .iter()
            .filter_map(|line| line.applied_offer_id())
            .collect();

        for offer_id in offer_ids {
            sqlx::query(
                "INSERT INTO daily_offer_redemptions (user_id, offer_id, redeemed_on) \
                 VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(offer_id)
            .bind(today)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Find an order by ID
    pub async fn find_by_id(&self, order_id: Uuid) -> Result<Option<Order>, OrderError> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Find orders by user ID with optional status filter, newest first
    pub async fn find_by_user_id(
        &self,
        user_id: i32,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrderError> {
        let orders = match status {
            Some(status_filter) => {
                let sql = format!(
                    "SELECT {} FROM orders WHERE user_id = $1 AND status = $2 \
                     ORDER BY created_at DESC",
                    ORDER_COLUMNS
                );
                sqlx::query_as::<_, Order>(&sql)
                    .bind(user_id)
                    .bind(status_filter)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
                    ORDER_COLUMNS
                );
                sqlx::query_as::<_, Order>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(orders)
    }

    /// Find all orders with optional status filter, newest first (staff view)
    pub async fn find_all(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, OrderError> {
        let orders = match status {
            Some(status_filter) => {
                let sql = format!(
                    "SELECT {} FROM orders WHERE status = $1 ORDER BY created_at DESC",
                    ORDER_COLUMNS
                );
                sqlx::query_as::<_, Order>(&sql)
                    .bind(status_filter)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM orders ORDER BY created_at DESC",
                    ORDER_COLUMNS
                );
                sqlx::query_as::<_, Order>(&sql).fetch_all(&self.pool).await?
            }
        };

        Ok(orders)
    }

    /// Update order status
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let sql = format!(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            ORDER_COLUMNS
        );

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(new_status)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(OrderError::NotFound)?;

        Ok(order)
    }

    /// Find all item snapshots for a given order
    pub async fn items_for_order(&self, order_id: Uuid) -> Result<Vec<OrderItem>, OrderError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, menu_item_id, name, base_price, quantity, unit_price, \
                    line_total, applied_daily_offer_id \
             FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Find the add-on snapshots for a given order item
    pub async fn addons_for_item(
        &self,
        order_item_id: i32,
    ) -> Result<Vec<OrderItemAddon>, OrderError> {
        let addons = sqlx::query_as::<_, OrderItemAddon>(
            "SELECT id, order_item_id, addon_id, name, price \
             FROM order_item_addons WHERE order_item_id = $1 ORDER BY id",
        )
        .bind(order_item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(addons)
    }
}
