// Authentication middleware for protected routes

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use crate::auth::{error::AuthError, models::Role, token::TokenService};
use tracing::{debug, warn};

/// Authenticated user extractor for protected routes
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// True for staff and admin accounts
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Staff | Role::Admin)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::ConfigError("JWT_SECRET not configured".to_string()))?;

        let token_service = TokenService::new(jwt_secret);
        let claims = token_service.validate_access_token(token)?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Authorization middleware that requires one of a set of roles
///
/// Extracts the JWT from the Authorization header, validates it, and checks
/// the user's role against the allowed set.
#[derive(Debug, Clone)]
pub struct RequireRole {
    allowed: &'static [Role],
}

impl RequireRole {
    /// Create a middleware allowing the given roles
    pub fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    /// Middleware requiring the admin role
    pub fn admin() -> Self {
        Self::new(&[Role::Admin])
    }

    /// Middleware allowing staff and admin roles
    pub fn staff() -> Self {
        Self::new(&[Role::Staff, Role::Admin])
    }

    /// Middleware function that validates role-based access
    pub async fn middleware(
        self,
        request: Request<Body>,
        next: Next,
    ) -> Result<Response, AuthError> {
        let endpoint = request.uri().path().to_string();

        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(|| {
                warn!(
                    "Missing Authorization header in request to protected endpoint: {}",
                    endpoint
                );
                AuthError::MissingToken
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header format for endpoint: {}", endpoint);
                AuthError::InvalidToken
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!(
                "Authorization header missing 'Bearer ' prefix for endpoint: {}",
                endpoint
            );
            AuthError::InvalidToken
        })?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::ConfigError("JWT_SECRET not configured".to_string()))?;

        let token_service = TokenService::new(jwt_secret);
        let claims = token_service.validate_access_token(token)?;

        if !self.allowed.contains(&claims.role) {
            warn!(
                "Authorization failed: user_id={}, allowed={:?}, actual={}, endpoint={}",
                claims.sub, self.allowed, claims.role, endpoint
            );
            return Err(AuthError::InsufficientPermissions {
                required: self.allowed,
                actual: claims.role,
            });
        }

        debug!(
            "Authorization successful: user_id={}, role={}, endpoint={}",
            claims.sub, claims.role, endpoint
        );
        Ok(next.run(request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn create_parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();

        let (parts, _) = req.into_parts();
        parts
    }

    fn create_parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string())
    }

    #[tokio::test]
    async fn test_valid_token_is_accepted() {
        std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

        let service = test_token_service();
        let token = service
            .generate_access_token(42, "test@example.com", Role::Customer)
            .unwrap();
        let auth_header = format!("Bearer {}", token);

        let mut parts = create_parts_with_auth(&auth_header);
        let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;

        assert!(result.is_ok());
        let user = result.unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_missing_authorization_header() {
        let mut parts = create_parts_without_auth();
        let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_malformed_token_is_rejected() {
        std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

        for auth_value in [
            "Bearer invalid_token",
            "Bearer not.a.valid.jwt",
            "InvalidFormat token",
            "Basic dXNlcjpwYXNz",
        ] {
            let mut parts = create_parts_with_auth(auth_value);
            let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;
            assert!(result.is_err());
        }
    }

    #[tokio::test]
    async fn test_staff_gate_allows_admin() {
        std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

        let gate = RequireRole::staff();
        assert!(gate.allowed.contains(&Role::Admin));
        assert!(gate.allowed.contains(&Role::Staff));
        assert!(!gate.allowed.contains(&Role::Customer));
    }

    #[tokio::test]
    async fn test_admin_gate_excludes_staff() {
        let gate = RequireRole::admin();
        assert!(gate.allowed.contains(&Role::Admin));
        assert!(!gate.allowed.contains(&Role::Staff));
    }
}
