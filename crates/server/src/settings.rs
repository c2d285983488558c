//! # Server Configuration
//!
//! Explicit configuration structs for the pieces the server composes. Each is
//! built once at startup (see the cli crate) and passed into [`crate::AppState`];
//! nothing in the services reads the environment directly.

use chrono::Duration;
use error::AppError;
use otp::Alphabet;

/// OTP policy for one flow.
///
/// Cooldown throttles deliveries; validity bounds the secret's lifetime. The
/// two flows get independent instances so operators can tune them separately.
#[derive(Debug, Clone)]
pub struct OtpFlowConfig {
    /// Number of characters in a generated OTP.
    pub otp_length: usize,
    /// Characters an OTP is drawn from.
    pub otp_alphabet: Alphabet,
    /// Minimum minutes between two deliveries for one identity.
    pub cooldown_minutes: i64,
    /// Minutes an issued OTP stays acceptable.
    pub validity_minutes: i64,
}

impl OtpFlowConfig {
    /// Cooldown window as a duration.
    pub fn cooldown(&self) -> Duration {
        Duration::minutes(self.cooldown_minutes)
    }

    /// Validity window as a duration.
    pub fn validity(&self) -> Duration {
        Duration::minutes(self.validity_minutes)
    }

    /// Password-reset policy from `JANUS_RESET_*` environment variables.
    pub fn reset_from_env() -> Result<Self, AppError> {
        Ok(Self {
            otp_length: parse_env("JANUS_RESET_OTP_LENGTH", 12)?,
            otp_alphabet: Alphabet::alphanumeric(),
            cooldown_minutes: parse_env("JANUS_RESET_COOLDOWN_MINUTES", 2)?,
            validity_minutes: parse_env("JANUS_RESET_OTP_VALIDITY_MINUTES", 15)?,
        })
    }

    /// Email-verification policy from `JANUS_VERIFICATION_*` environment
    /// variables, including the custom alphabet.
    pub fn verification_from_env() -> Result<Self, AppError> {
        let alphabet = match std::env::var("JANUS_VERIFICATION_OTP_ALPHABET") {
            Ok(chars) => Alphabet::custom(&chars)
                .ok_or_else(|| AppError::config("JANUS_VERIFICATION_OTP_ALPHABET must not be empty"))?,
            Err(_) => Alphabet::digits(),
        };

        Ok(Self {
            otp_length: parse_env("JANUS_VERIFICATION_OTP_LENGTH", 6)?,
            otp_alphabet: alphabet,
            cooldown_minutes: parse_env("JANUS_VERIFICATION_COOLDOWN_MINUTES", 2)?,
            validity_minutes: parse_env("JANUS_VERIFICATION_OTP_VALIDITY_MINUTES", 15)?,
        })
    }
}

/// SMTP relay configuration for outbound transactional mail.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host:         String,
    pub port:         u16,
    pub username:     String,
    pub password:     String,
    pub from_address: String,
}

impl SmtpConfig {
    /// Build from `JANUS_SMTP_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a config error when a required variable is missing or the port
    /// does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            host:         require_env("JANUS_SMTP_HOST")?,
            port:         parse_env("JANUS_SMTP_PORT", 587)?,
            username:     require_env("JANUS_SMTP_USERNAME")?,
            password:     require_env("JANUS_SMTP_PASSWORD")?,
            from_address: require_env("JANUS_SMTP_FROM_ADDRESS")?,
        })
    }
}

fn require_env(name: &str) -> Result<String, AppError> {
    std::env::var(name).map_err(|_| AppError::config(format!("{name} is not set")))
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}
