//! Auth flow request/response types.

use auth::TokenPair;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::users::UserView;

/// Request body for signup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 120, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 120, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
}

/// Request body for signin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for access-token renewal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenewAccessTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Request body for requesting a password-reset OTP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RequestResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request body for confirming a password reset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "OTP is required"))]
    pub otp: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub new_password: String,
}

/// Payload returned by signup: the created user plus its first token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupData {
    pub user:   UserView,
    pub tokens: TokenPair,
}

/// Payload carrying a human-readable confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    pub message: String,
}
