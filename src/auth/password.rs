// Password hashing and validation service

use crate::auth::error::AuthError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use regex::Regex;
use std::sync::OnceLock;

static HAS_LETTER: OnceLock<Regex> = OnceLock::new();
static HAS_DIGIT: OnceLock<Regex> = OnceLock::new();

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a random salt
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::TokenGenerationError(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against a stored hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Validate password strength requirements
    ///
    /// At least 8 characters, with at least one letter and one digit.
    pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
        if password.len() < 8 {
            return Err(AuthError::WeakPassword(
                "must be at least 8 characters".to_string(),
            ));
        }

        let has_letter = HAS_LETTER
            .get_or_init(|| Regex::new(r"[A-Za-z]").unwrap());
        let has_digit = HAS_DIGIT
            .get_or_init(|| Regex::new(r"[0-9]").unwrap());

        if !has_letter.is_match(password) {
            return Err(AuthError::WeakPassword(
                "must contain at least one letter".to_string(),
            ));
        }
        if !has_digit.is_match(password) {
            return Err(AuthError::WeakPassword(
                "must contain at least one digit".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash_password("espresso42").unwrap();

        assert!(PasswordService::verify_password("espresso42", &hash).unwrap());
        assert!(!PasswordService::verify_password("espresso43", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let h1 = PasswordService::hash_password("espresso42").unwrap();
        let h2 = PasswordService::hash_password("espresso42").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_strength_rejects_short() {
        assert!(PasswordService::validate_password_strength("ab1").is_err());
    }

    #[test]
    fn test_strength_requires_letter_and_digit() {
        assert!(PasswordService::validate_password_strength("12345678").is_err());
        assert!(PasswordService::validate_password_strength("abcdefgh").is_err());
        assert!(PasswordService::validate_password_strength("abcdefg1").is_ok());
    }
}
