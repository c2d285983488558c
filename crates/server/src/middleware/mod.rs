//! # HTTP Middleware
//!
//! - [`request_id`]: assigns every request a unique id (URID) that handlers
//!   echo into the response envelope
//! - [`auth`]: bearer-token authorization for protected routes

pub mod auth;
pub mod request_id;
