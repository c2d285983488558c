//! # Janus Error Infrastructure
//!
//! Error types and the service result envelope shared by every crate in the
//! workspace. [`AppError`] covers infrastructure failures; [`domain::DomainError`]
//! is the catalogue of expected, enumerable business errors that flows return
//! to clients inside a [`ServiceResult`].

pub mod domain;
pub mod envelope;

pub use domain::DomainError;
pub use envelope::{ResponseMeta, ServiceError, ServiceResult, ValidationIssue};

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Main application error type.
///
/// These are the failures that escape a flow: broken infrastructure, bad
/// configuration, unclassified bugs. Expected business outcomes (wrong OTP,
/// duplicate email, ...) are *not* errors here — they travel as
/// [`DomainError`] values inside the result envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound { message: String },

    #[error("BadRequest: {message}")]
    BadRequest { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Validation: {message}")]
    Validation { message: String },

    #[error("Crypto: {message}")]
    Crypto { message: String },

    #[error("Email: {message}")]
    Email { message: String },

    #[error("Database: {message}")]
    Database { message: String },

    #[error("Config: {message}")]
    Config { message: String },

    #[error("Io: {message}")]
    Io { message: String },

    #[error("Internal: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a not found error.
    #[inline]
    pub fn not_found(message: impl ToString) -> Self {
        Self::NotFound {
            message: message.to_string(),
        }
    }

    /// Create a bad request error.
    #[inline]
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create an unauthorized error.
    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self {
        Self::Unauthorized {
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    #[inline]
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create a crypto error (hashing, signing, sealing).
    #[inline]
    pub fn crypto(message: impl ToString) -> Self {
        Self::Crypto {
            message: message.to_string(),
        }
    }

    /// Create an email delivery error.
    #[inline]
    pub fn email(message: impl ToString) -> Self {
        Self::Email {
            message: message.to_string(),
        }
    }

    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> http::StatusCode {
        match self {
            AppError::NotFound { .. } => http::StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => http::StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => http::StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } => http::StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Crypto { .. }
            | AppError::Email { .. }
            | AppError::Database { .. }
            | AppError::Config { .. }
            | AppError::Io { .. }
            | AppError::Internal { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::Unauthorized { .. } => "UNAUTHORIZED",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Crypto { .. } => "CRYPTO_ERROR",
            AppError::Email { .. } => "EMAIL_ERROR",
            AppError::Database { .. } => "DATABASE_ERROR",
            AppError::Config { .. } => "CONFIG_ERROR",
            AppError::Io { .. } => "IO_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound { message }
            | AppError::BadRequest { message }
            | AppError::Unauthorized { message }
            | AppError::Validation { message }
            | AppError::Crypto { message }
            | AppError::Email { message }
            | AppError::Database { message }
            | AppError::Config { message }
            | AppError::Io { message }
            | AppError::Internal { message } => message,
        }
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convert Sea-ORM database errors to AppError.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// Convert validator errors to AppError, flattening field messages.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(_, errors)| {
                errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "Invalid value".to_string())
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let message = if messages.is_empty() {
            "Validation failed".to_string()
        }
        else {
            messages.join(", ")
        };

        Self::Validation { message }
    }
}
