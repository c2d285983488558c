//! # Credential & Token Primitives
//!
//! The pieces of the auth flows that touch key material:
//!
//! - [`password`]: Argon2id hashing and verification, used for account
//!   passwords and for reset OTPs at rest
//! - [`tokens`]: signed access/refresh token pairs
//! - [`sealed`]: authenticated encryption for verification OTPs, so the
//!   resend path can recover the exact value without plaintext at rest
//!
//! Everything here is pure and synchronous; persistence and delivery live in
//! the server crate.

pub mod password;
pub mod sealed;
pub mod tokens;

pub use password::{hash_secret, verify_secret};
pub use sealed::SealingKey;
pub use tokens::{Claims, TokenConfig, TokenPair};
pub use secrecy;
pub use subtle;
