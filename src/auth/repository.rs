// Database repositories for users and refresh tokens

use crate::auth::{error::AuthError, models::{RefreshToken, User}};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

/// Column list shared by every user query so FromRow stays in sync
pub(crate) const USER_COLUMNS: &str =
    "id, email, password_hash, role, email_verified, loyalty_points, lifetime_points, \
     order_count, date_of_birth, birthday_discount_value, birthday_discount_type, \
     referral_code, referred_by, has_linked_socials, has_left_review, created_at";

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new customer account
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        date_of_birth: Option<chrono::NaiveDate>,
        referral_code: &str,
        referred_by: Option<i32>,
    ) -> Result<User, AuthError> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, date_of_birth, referral_code, referred_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(password_hash)
            .bind(date_of_birth)
            .bind(referral_code)
            .bind(referred_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AuthError::EmailAlreadyExists;
                    }
                }
                AuthError::DatabaseError(e.to_string())
            })?;

        Ok(user)
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let sql = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find a user by their referral code
    pub async fn find_by_referral_code(&self, code: &str) -> Result<Option<User>, AuthError> {
        let sql = format!(
            "SELECT {} FROM users WHERE referral_code = $1",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Check whether a referral code is already taken
    pub async fn referral_code_exists(&self, code: &str) -> Result<bool, AuthError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE referral_code = $1)"
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }
}

/// Token repository for refresh token operations
#[derive(Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new TokenRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hash a token using SHA-256 so raw tokens never touch the database
    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Store a refresh token (hashed)
    pub async fn store_refresh_token(
        &self,
        user_id: i32,
        token: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), AuthError> {
        let token_hash = Self::hash_token(token);

        sqlx::query(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)"
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Verify a refresh token exists and is not expired
    pub async fn verify_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        let token_hash = Self::hash_token(token);

        let refresh_token = sqlx::query_as::<_, RefreshToken>(
            "SELECT id, user_id, token_hash, expires_at, created_at \
             FROM refresh_tokens \
             WHERE token_hash = $1 AND expires_at > NOW()"
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(refresh_token)
    }

    /// Invalidate a refresh token (used on rotation)
    pub async fn invalidate_token(&self, token: &str) -> Result<(), AuthError> {
        let token_hash = Self::hash_token(token);

        sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
