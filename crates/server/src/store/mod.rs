//! # Store Layer
//!
//! Repository functions over the janus tables. Every function is generic over
//! [`sea_orm::ConnectionTrait`], so a flow opens one transaction and threads
//! that single scope through each operation explicitly — read-decide-write
//! sequences commit or roll back as a unit, and nothing here touches an
//! ambient connection.

pub mod email_logs;
pub mod email_verifications;
pub mod password_resets;
pub mod users;
