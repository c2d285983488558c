//! Email-verification flow request types.

use serde::Deserialize;
use validator::Validate;

/// Request body for requesting a verification OTP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RequestEmailVerificationRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request body for verifying an email with an OTP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "OTP is required"))]
    pub otp: String,
}
