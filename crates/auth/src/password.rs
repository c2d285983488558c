//! Argon2id hashing for secrets at rest.
//!
//! One pair of functions serves both account passwords and password-reset
//! OTPs — each is a short user-supplied secret whose stored form must not be
//! reversible. Hashes use the PHC string format, so parameters travel with
//! the hash and can be tuned without invalidating existing rows.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur during hashing or verification.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored hash is not a valid PHC string")]
    InvalidHashFormat,
}

impl From<PasswordError> for error::AppError {
    fn from(err: PasswordError) -> Self {
        error::AppError::crypto(err.to_string())
    }
}

/// Hash a secret with Argon2id under a fresh random salt.
///
/// # Errors
///
/// Returns an error if the underlying hasher fails.
pub fn hash_secret(secret: &SecretString) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(secret.expose_secret().as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a secret against a stored PHC hash string.
///
/// Returns `Ok(true)` on a match, `Ok(false)` on a clean mismatch.
///
/// # Errors
///
/// Returns an error only if the stored hash cannot be parsed — a mismatching
/// secret is not an error.
pub fn verify_secret(secret: &SecretString, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Ok(Argon2::default()
        .verify_password(secret.expose_secret().as_bytes(), &parsed)
        .is_ok())
}

/// Checks if a password meets the minimum requirements.
///
/// # Errors
///
/// Returns the full list of unmet requirements.
pub fn validate_password_strength(password: &str) -> Result<(), Vec<PasswordPolicyViolation>> {
    let mut violations = Vec::new();

    if password.chars().count() < 8 {
        violations.push(PasswordPolicyViolation::TooShort);
    }

    if password.chars().count() > 128 {
        violations.push(PasswordPolicyViolation::TooLong);
    }

    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        violations.push(PasswordPolicyViolation::MissingLetter);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PasswordPolicyViolation::MissingDigit);
    }

    if violations.is_empty() {
        Ok(())
    }
    else {
        Err(violations)
    }
}

/// A single unmet password requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordPolicyViolation {
    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Password must be at most 128 characters long")]
    TooLong,

    #[error("Password must contain at least one letter")]
    MissingLetter,

    #[error("Password must contain at least one digit")]
    MissingDigit,
}
