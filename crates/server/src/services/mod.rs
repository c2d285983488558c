//! # Flow Orchestrators
//!
//! The user-facing flows, composed from the store, the OTP engine, the token
//! issuer and the mail capability. Each flow that reads-then-writes opens one
//! transaction against the store and threads it through every operation, so
//! concurrent requests for the same identity cannot interleave between the
//! read and the write.
//!
//! Flows return [`error::ServiceResult`] envelopes; only infrastructure
//! failures propagate as `Err`.

pub mod auth;
pub mod users;
pub mod verification;
