//! # Service Result Envelope
//!
//! The stable result shape every flow returns, regardless of transport:
//!
//! ```json
//! {
//!   "isSuccess": true,
//!   "httpStatusCode": 200,
//!   "meta": { "urid": "..." },
//!   "error": null,
//!   "data": { ... }
//! }
//! ```
//!
//! Domain errors are carried *inside* the envelope; the HTTP layer reuses
//! `httpStatusCode` as the response status so the body and the status line
//! never disagree.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Response metadata attached to every envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Unique request id for log correlation.
    pub urid: Option<String>,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field:   String,
    pub message: String,
}

/// Error body carried inside a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    /// Stable error code.
    pub code: String,

    /// Human-readable message.
    pub message: String,

    /// Field-level details, present only for validation failures.
    pub validation_errors: Option<Vec<ValidationIssue>>,
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self {
            code:              err.code().to_string(),
            message:           err.message().to_string(),
            validation_errors: None,
        }
    }
}

/// The envelope returned by every service flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResult<T> {
    pub is_success: bool,

    pub http_status_code: u16,

    pub meta: ResponseMeta,

    pub error: Option<ServiceError>,

    pub data: Option<T>,
}

impl<T> ServiceResult<T> {
    /// Successful result carrying data.
    pub fn ok(urid: Option<String>, data: T) -> Self {
        Self::ok_with_status(StatusCode::OK, urid, Some(data))
    }

    /// Successful result with no payload.
    pub fn ok_empty(urid: Option<String>) -> Self {
        Self::ok_with_status(StatusCode::OK, urid, None)
    }

    /// Successful result with an explicit status code.
    pub fn ok_with_status(status: StatusCode, urid: Option<String>, data: Option<T>) -> Self {
        Self {
            is_success: true,
            http_status_code: status.as_u16(),
            meta: ResponseMeta { urid },
            error: None,
            data,
        }
    }

    /// Failed result for a domain error; the envelope status comes from the
    /// error itself.
    pub fn rejected(urid: Option<String>, err: DomainError) -> Self {
        Self {
            is_success: false,
            http_status_code: err.status().as_u16(),
            meta: ResponseMeta { urid },
            error: Some(err.into()),
            data: None,
        }
    }

    /// Failed validation result with field-level details.
    pub fn invalid(urid: Option<String>, issues: Vec<ValidationIssue>) -> Self {
        let err = DomainError::ValidationError;
        Self {
            is_success: false,
            http_status_code: err.status().as_u16(),
            meta: ResponseMeta { urid },
            error: Some(ServiceError {
                code:              err.code().to_string(),
                message:           err.message().to_string(),
                validation_errors: Some(issues),
            }),
            data: None,
        }
    }

    /// The HTTP status this envelope should be served with.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Map the payload to a different type, keeping everything else.
    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ServiceResult {
            is_success: self.is_success,
            http_status_code: self.http_status_code,
            meta: self.meta,
            error: self.error,
            data: self.data.map(f),
        }
    }
}

impl<T: Serialize> IntoResponse for ServiceResult<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
