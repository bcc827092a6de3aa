// JWT token generation and validation service

use crate::auth::error::AuthError;
use crate::auth::models::Role;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub email: String,
    pub role: Role,
    pub exp: i64,        // expiration timestamp
    pub iat: i64,        // issued at timestamp
}

/// Token service for JWT operations
pub struct TokenService {
    secret: String,
    access_token_duration: i64,  // in seconds
    refresh_token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key
    /// Access tokens expire in 15 minutes, refresh tokens in 7 days
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            access_token_duration: 900,      // 15 minutes
            refresh_token_duration: 604800,  // 7 days
        }
    }

    /// Generate an access token
    pub fn generate_access_token(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        self.generate_token(user_id, email, role, self.access_token_duration)
    }

    /// Generate a refresh token
    pub fn generate_refresh_token(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        self.generate_token(user_id, email, role, self.refresh_token_duration)
    }

    fn generate_token(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
        duration: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + duration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate an access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token(token)
    }

    /// Validate a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token(token)
    }

    /// Internal helper to validate any token
    fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                AuthError::ExpiredToken
            } else {
                AuthError::InvalidToken
            }
        })
    }

    /// Generate both access and refresh tokens
    pub fn generate_token_pair(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
    ) -> Result<(String, String), AuthError> {
        let access_token = self.generate_access_token(user_id, email, role)?;
        let refresh_token = self.generate_refresh_token(user_id, email, role)?;
        Ok((access_token, refresh_token))
    }

    /// Refresh token lifetime in seconds, used to compute expiry rows
    pub fn refresh_token_duration(&self) -> i64 {
        self.refresh_token_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string())
    }

    #[test]
    fn test_round_trip_preserves_claims() {
        let service = test_service();
        let token = service
            .generate_access_token(7, "barista@steamsbury.test", Role::Staff)
            .unwrap();

        let claims = service.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "barista@steamsbury.test");
        assert_eq!(claims.role, Role::Staff);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = test_service();
        let result = service.validate_access_token("not.a.jwt");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = test_service();
        let other = TokenService::new("a_completely_different_secret".to_string());

        let token = service
            .generate_access_token(1, "user@example.com", Role::Customer)
            .unwrap();

        assert!(other.validate_access_token(&token).is_err());
    }

    proptest! {
        #[test]
        fn prop_token_pair_round_trips(
            user_id in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_service();
            let (access, refresh) = service
                .generate_token_pair(user_id, &email, Role::Customer)?;

            let access_claims = service.validate_access_token(&access).unwrap();
            let refresh_claims = service.validate_refresh_token(&refresh).unwrap();

            prop_assert_eq!(access_claims.sub, user_id);
            prop_assert_eq!(refresh_claims.sub, user_id);
            prop_assert!(refresh_claims.exp > access_claims.exp);
        }
    }
}
