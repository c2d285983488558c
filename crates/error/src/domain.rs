//! # Domain Error Catalogue
//!
//! Expected, enumerable business errors with stable wire codes. These are
//! returned to clients inside the service result envelope, never thrown past
//! the service boundary.
//!
//! Several variants deliberately share a code/message with another variant so
//! a caller cannot tell the underlying branches apart: signin does not reveal
//! whether the email or the password was wrong, and the password-reset flow
//! maps "no such user" and "no OTP issued" onto the same `InvalidOTP` shape a
//! plain mismatch produces.

use std::fmt;

use http::StatusCode;

/// Catalogue of domain errors across the auth and verification flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// Signup attempted with an email that already has an account.
    UserAlreadyExists,
    /// Signin failed; covers both unknown email and wrong password.
    IncorrectUserCredential,
    /// Token renewal failed; covers expired, malformed and forged tokens.
    InvalidRefreshToken,
    /// Password-reset OTP rejected; covers mismatch, never-issued and
    /// unknown-user so the flow does not leak account existence.
    InvalidOtp,
    /// Password-reset OTP outside its validity window or already consumed.
    ExpiredOtp,
    /// Verification OTP re-requested before the cooldown elapsed.
    RetryNotAllowedWithinCoolDownPeriod,
    /// No verification request on record for the email.
    NoEmailVerificationRequestFound,
    /// Verification OTP outside its validity window or already consumed.
    EmailVerificationOtpExpired,
    /// Verification OTP does not match the outstanding one.
    InvalidEmailVerificationOtp,
    /// User lookup by id found nothing.
    UserDoesNotExist,
    /// Protected route called without a bearer token.
    NoAuthorizationToken,
    /// Catch-all 404.
    ResourceNotFound,
    /// Request body failed schema validation.
    ValidationError,
    /// Unclassified internal failure; detail never leaves the server.
    SomethingWentWrong,
}

impl DomainError {
    /// Stable wire code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::UserAlreadyExists => "UserAlreadyExists",
            DomainError::IncorrectUserCredential => "IncorrectUserCredential",
            DomainError::InvalidRefreshToken => "InvalidRefreshToken",
            DomainError::InvalidOtp => "InvalidOTP",
            DomainError::ExpiredOtp => "ExpiredOTP",
            DomainError::RetryNotAllowedWithinCoolDownPeriod => "RetryNotAllowedWithinCoolDownPeriod",
            DomainError::NoEmailVerificationRequestFound => "NoEmailVerificationRequestFound",
            DomainError::EmailVerificationOtpExpired => "EmailVerificationOtpExpired",
            DomainError::InvalidEmailVerificationOtp => "InvalidEmailVerificationOtp",
            DomainError::UserDoesNotExist => "UserDoesNotExists",
            DomainError::NoAuthorizationToken => "NoAuthorizationToken",
            DomainError::ResourceNotFound => "ResourceNotFound",
            DomainError::ValidationError => "ValidationError",
            DomainError::SomethingWentWrong => "SomethingWentWrong",
        }
    }

    /// Human-readable message for the error.
    pub fn message(&self) -> &'static str {
        match self {
            DomainError::UserAlreadyExists => "User already exists",
            DomainError::IncorrectUserCredential => "Email or password is incorrect",
            DomainError::InvalidRefreshToken => "Invalid refresh token",
            DomainError::InvalidOtp => "Invalid OTP",
            DomainError::ExpiredOtp => "OTP Expired",
            DomainError::RetryNotAllowedWithinCoolDownPeriod => {
                "You're attempting to retry verification before the cool-down period. Please wait for some time \
                 before retrying."
            },
            DomainError::NoEmailVerificationRequestFound => "No verification request found for the given email.",
            DomainError::EmailVerificationOtpExpired => "The OTP has expired.",
            DomainError::InvalidEmailVerificationOtp => "The OTP you've entered is invalid.",
            DomainError::UserDoesNotExist => "User doesn't exists",
            DomainError::NoAuthorizationToken => "No authorization token provided",
            DomainError::ResourceNotFound => "Resource Not Found",
            DomainError::ValidationError => "Validation Error",
            DomainError::SomethingWentWrong => "Something went wrong.",
        }
    }

    /// HTTP status the enclosing envelope carries for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            DomainError::NoAuthorizationToken => StatusCode::UNAUTHORIZED,
            DomainError::ResourceNotFound => StatusCode::NOT_FOUND,
            DomainError::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::SomethingWentWrong => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blurred_reset_errors_share_wire_shape() {
        // Mismatch, not-issued and unknown-user must be indistinguishable.
        assert_eq!(DomainError::InvalidOtp.code(), "InvalidOTP");
        assert_eq!(DomainError::InvalidOtp.message(), "Invalid OTP");
        assert_eq!(DomainError::InvalidOtp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_signin_error_does_not_name_the_field() {
        let msg = DomainError::IncorrectUserCredential.message();
        assert!(msg.contains("Email or password"));
    }

    #[test]
    fn test_statuses() {
        assert_eq!(DomainError::NoAuthorizationToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(DomainError::ResourceNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            DomainError::ValidationError.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            DomainError::SomethingWentWrong.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(DomainError::UserAlreadyExists.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_display_includes_code() {
        let s = DomainError::ExpiredOtp.to_string();
        assert!(s.starts_with("ExpiredOTP"));
    }
}
