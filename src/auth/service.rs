// Authentication service - business logic layer

use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, RegisterRequest, UserResponse},
    password::PasswordService,
    repository::{TokenRepository, UserRepository},
    token::TokenService,
};
use crate::loyalty::{repository::LoyaltyRepository, REFERRAL_BONUS_POINTS};

/// Authentication service coordinating all auth operations
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    token_repo: TokenRepository,
    token_service: std::sync::Arc<TokenService>,
    loyalty_repo: LoyaltyRepository,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        user_repo: UserRepository,
        token_repo: TokenRepository,
        token_service: std::sync::Arc<TokenService>,
        loyalty_repo: LoyaltyRepository,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            token_service,
            loyalty_repo,
        }
    }

    /// Register a new customer account
    ///
    /// Validates password strength, hashes the password, assigns a unique
    /// referral code, and credits the referrer's loyalty balance when a
    /// valid referral code accompanies the registration.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        PasswordService::validate_password_strength(&request.password)?;

        // Resolve the referrer before creating anything
        let referrer = match request.referral_code.as_deref() {
            Some(code) if !code.trim().is_empty() => {
                let referrer = self
                    .user_repo
                    .find_by_referral_code(code.trim())
                    .await?
                    .ok_or(AuthError::UnknownReferralCode)?;
                Some(referrer)
            }
            _ => None,
        };

        let password_hash = PasswordService::hash_password(&request.password)?;
        let referral_code = self.generate_unique_referral_code().await?;

        let user = self
            .user_repo
            .create_user(
                &request.email,
                &password_hash,
                request.date_of_birth,
                &referral_code,
                referrer.as_ref().map(|r| r.id),
            )
            .await?;

        tracing::info!("Registered user {} ({})", user.id, user.email);

        // Referral bonus goes to the referrer, not the new account
        if let Some(referrer) = referrer {
            self.loyalty_repo
                .credit_points(referrer.id, REFERRAL_BONUS_POINTS, "Referral bonus")
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
            tracing::info!(
                "Credited {} referral points to user {}",
                REFERRAL_BONUS_POINTS,
                referrer.id
            );
        }

        self.issue_tokens(user).await
    }

    /// Login a user with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &user.password_hash)? {
            tracing::warn!("Failed login attempt for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_tokens(user).await
    }

    /// Rotate a refresh token into a fresh token pair
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.token_service.validate_refresh_token(refresh_token)?;

        // The token must also exist server-side and be unexpired
        self.token_repo
            .verify_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Rotation: old token is dead once a new pair is issued
        self.token_repo.invalidate_token(refresh_token).await?;

        self.issue_tokens(user).await
    }

    /// Get current user information
    pub async fn get_current_user(&self, user_id: i32) -> Result<UserResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.into())
    }

    async fn issue_tokens(
        &self,
        user: crate::auth::models::User,
    ) -> Result<AuthResponse, AuthError> {
        let (access_token, refresh_token) =
            self.token_service
                .generate_token_pair(user.id, &user.email, user.role)?;

        let expires_at =
            Utc::now() + Duration::seconds(self.token_service.refresh_token_duration());
        self.token_repo
            .store_refresh_token(user.id, &refresh_token, expires_at)
            .await?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }

    /// Generate an 8-character referral code, retrying on collision
    async fn generate_unique_referral_code(&self) -> Result<String, AuthError> {
        for _ in 0..5 {
            let code: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(char::from)
                .collect::<String>()
                .to_uppercase();

            if !self.user_repo.referral_code_exists(&code).await? {
                return Ok(code);
            }
        }

        Err(AuthError::DatabaseError(
            "could not allocate a unique referral code".to_string(),
        ))
    }
}
