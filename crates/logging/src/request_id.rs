//! # Request ID Tracking
//!
//! Every incoming request gets a unique request id (URID) that is attached to
//! log events and echoed back in the response envelope's `meta.urid` field so
//! a client-reported failure can be matched to server logs.

use std::fmt;

use uuid::Uuid;

/// A unique request id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request id.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a request id supplied by an upstream proxy, if it looks sane.
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        if (8 ..= 64).contains(&value.len())
            && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            Some(Self(value.to_string()))
        }
        else {
            None
        }
    }

    /// Get the request id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
