//! Signed access/refresh token pairs.
//!
//! Both tokens of a pair are JWTs under the same deployment-wide key and
//! algorithm; they differ only in lifetime and `jti`. Tokens are stateless —
//! nothing is persisted, verification is signature + expiry, and renewing a
//! pair does not revoke the refresh token it was minted from.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{Duration, Utc};
use error::AppError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token signing configuration, fixed per deployment.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Base64-encoded signing secret.
    pub secret: String,
    /// Signing algorithm, e.g. "HS256".
    pub algorithm: String,
    /// Access token lifetime in seconds.
    pub access_ttl_seconds: u64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_seconds: u64,
    /// Token issuer claim.
    pub issuer: String,
}

/// Claims carried by both tokens of a pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub uid: String,

    /// Token issuer.
    pub iss: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Unique token id; reserved for a future revocation list.
    pub jti: String,
}

/// An access/refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token:  String,
    pub refresh_token: String,
}

impl TokenConfig {
    fn parsed_algorithm(&self) -> Result<Algorithm, AppError> {
        self.algorithm
            .parse::<Algorithm>()
            .map_err(|_| AppError::config(format!("Unknown token algorithm: {}", self.algorithm)))
    }

    fn encoding_key(&self) -> Result<EncodingKey, AppError> {
        let bytes = BASE64
            .decode(&self.secret)
            .map_err(|e| AppError::config(format!("Token secret is not valid base64: {e}")))?;
        Ok(EncodingKey::from_secret(&bytes))
    }

    fn decoding_key(&self) -> Result<DecodingKey, AppError> {
        let bytes = BASE64
            .decode(&self.secret)
            .map_err(|e| AppError::config(format!("Token secret is not valid base64: {e}")))?;
        Ok(DecodingKey::from_secret(&bytes))
    }
}

/// Issue an access/refresh token pair for a subject.
///
/// Each token carries its own random `jti` and its own expiry.
///
/// # Errors
///
/// Returns an error if the configured key or algorithm is unusable.
pub fn issue_pair(config: &TokenConfig, subject_id: &str) -> Result<TokenPair, AppError> {
    let access_token = sign(config, subject_id, config.access_ttl_seconds)?;
    let refresh_token = sign(config, subject_id, config.refresh_ttl_seconds)?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn sign(config: &TokenConfig, subject_id: &str, ttl_seconds: u64) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        uid: subject_id.to_string(),
        iss: config.issuer.clone(),
        exp: (now + Duration::seconds(ttl_seconds as i64)).timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let header = Header::new(config.parsed_algorithm()?);

    jsonwebtoken::encode(&header, &claims, &config.encoding_key()?)
        .map_err(|e| AppError::crypto(format!("Failed to sign token: {e}")))
}

/// Verify a token's signature and expiry and return its claims.
///
/// # Errors
///
/// Every failure mode — bad signature, expired, malformed, wrong issuer —
/// collapses into one unauthorized error; callers get no further detail.
pub fn verify(config: &TokenConfig, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(config.parsed_algorithm()?);
    validation.set_issuer(&[config.issuer.clone()]);
    validation.validate_exp = true;

    let data = jsonwebtoken::decode::<Claims>(token, &config.decoding_key()?, &validation)
        .map_err(|_| AppError::unauthorized("Invalid token"))?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    use super::*;

    fn test_config() -> TokenConfig {
        TokenConfig {
            secret: STANDARD.encode("a-unit-test-secret-of-decent-length"),
            algorithm: "HS256".to_string(),
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 86_400,
            issuer: "janus-test".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let config = test_config();
        let pair = issue_pair(&config, "user-42").unwrap();

        let access = verify(&config, &pair.access_token).unwrap();
        let refresh = verify(&config, &pair.refresh_token).unwrap();

        assert_eq!(access.uid, "user-42");
        assert_eq!(refresh.uid, "user-42");
        assert_eq!(access.iss, "janus-test");
    }

    #[test]
    fn test_tokens_have_distinct_ids_and_expiries() {
        let config = test_config();
        let pair = issue_pair(&config, "user-42").unwrap();

        let access = verify(&config, &pair.access_token).unwrap();
        let refresh = verify(&config, &pair.refresh_token).unwrap();

        assert_ne!(access.jti, refresh.jti);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let config = test_config();
        let pair = issue_pair(&config, "user-42").unwrap();

        // Flip a character in the signature segment.
        let mut token = pair.access_token.clone();
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });

        assert!(verify(&config, &token).is_err());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let config = test_config();

        // Sign a token that expired well past jsonwebtoken's default leeway.
        let now = Utc::now();
        let claims = Claims {
            uid: "user-42".to_string(),
            iss: config.issuer.clone(),
            exp: (now - Duration::minutes(5)).timestamp(),
            iat: (now - Duration::minutes(10)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let header = Header::new(Algorithm::HS256);
        let bytes = STANDARD.decode(&config.secret).unwrap();
        let stale = jsonwebtoken::encode(&header, &claims, &EncodingKey::from_secret(&bytes)).unwrap();

        assert!(verify(&config, &stale).is_err());
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let config = test_config();
        let pair = issue_pair(&config, "user-42").unwrap();

        let mut other = config.clone();
        other.issuer = "someone-else".to_string();

        assert!(verify(&other, &pair.access_token).is_err());
    }

    #[test]
    fn test_unknown_algorithm_is_config_error() {
        let mut config = test_config();
        config.algorithm = "XS999".to_string();
        assert!(issue_pair(&config, "user-42").is_err());
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let config = test_config();
        assert!(verify(&config, "not-a-jwt").is_err());
    }
}
