//! # Janus Entities
//!
//! Sea-ORM entity definitions for the janus data model:
//!
//! - [`users`]: account records
//! - [`password_reset_requests`]: append-style ledger of reset OTP issuances
//! - [`email_verification_requests`]: append-style ledger of verification OTP
//!   issuances
//! - [`email_logs`]: one row per accepted outbound email

pub mod email_logs;
pub mod email_verification_requests;
pub mod password_reset_requests;
pub mod users;
