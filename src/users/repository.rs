use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::auth::models::Role;
use crate::error::ApiError;
use crate::users::models::AdminUserView;

const ADMIN_VIEW_COLUMNS: &str =
    "id, email, role, email_verified, loyalty_points, lifetime_points, order_count, \
     date_of_birth, birthday_discount_value, birthday_discount_type, referral_code, \
     has_linked_socials, has_left_review, created_at";

/// Repository for admin-side user management
#[derive(Clone)]
pub struct UsersAdminRepository {
    pool: PgPool,
}

impl UsersAdminRepository {
    /// Create a new UsersAdminRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List users for the management screens
    pub async fn list_users(&self) -> Result<Vec<AdminUserView>, ApiError> {
        let sql = format!("SELECT {} FROM users ORDER BY id", ADMIN_VIEW_COLUMNS);

        let users = sqlx::query_as::<_, AdminUserView>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Fetch one user for the management screens
    pub async fn get_user(&self, id: i32) -> Result<AdminUserView, ApiError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", ADMIN_VIEW_COLUMNS);

        sqlx::query_as::<_, AdminUserView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                resource: "User".to_string(),
                id: id.to_string(),
            })
    }

    /// Change a user's role
    pub async fn set_role(&self, id: i32, role: Role) -> Result<AdminUserView, ApiError> {
        let sql = format!(
            "UPDATE users SET role = $1 WHERE id = $2 RETURNING {}",
            ADMIN_VIEW_COLUMNS
        );

        sqlx::query_as::<_, AdminUserView>(&sql)
            .bind(role)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                resource: "User".to_string(),
                id: id.to_string(),
            })
    }

    /// Grant (or replace) a one-shot birthday discount
    pub async fn grant_birthday_discount(
        &self,
        id: i32,
        value: Decimal,
        discount_type: &str,
    ) -> Result<AdminUserView, ApiError> {
        let sql = format!(
            "UPDATE users \
             SET birthday_discount_value = $1, birthday_discount_type = $2 \
             WHERE id = $3 RETURNING {}",
            ADMIN_VIEW_COLUMNS
        );

        sqlx::query_as::<_, AdminUserView>(&sql)
            .bind(value)
            .bind(discount_type)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                resource: "User".to_string(),
                id: id.to_string(),
            })
    }

    /// Mark a user's email as verified
    pub async fn set_email_verified(&self, id: i32) -> Result<AdminUserView, ApiError> {
        let sql = format!(
            "UPDATE users SET email_verified = TRUE WHERE id = $1 RETURNING {}",
            ADMIN_VIEW_COLUMNS
        );

        sqlx::query_as::<_, AdminUserView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                resource: "User".to_string(),
                id: id.to_string(),
            })
    }
}
