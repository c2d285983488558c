//! Email Verification Requests Entity
//!
//! Append-style ledger keyed by email (verification can run before an account
//! exists). Unlike the reset ledger this one supports re-sending the same OTP:
//! `requested_at` tracks the last delivery and moves independently of the OTP
//! value, while `created_at` stays at first issue and anchors the validity
//! window.
//!
//! `otp_sealed` holds `nonce || ciphertext` of the OTP under the server's
//! sealing key, so resend can recover the exact value without keeping
//! plaintext at rest.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "email_verification_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:            Uuid,
    pub email:         String,
    pub request_ip:    Option<String>,
    pub otp_sealed:    Vec<u8>,
    pub is_otp_usable: bool,
    /// Last time the OTP was (re)delivered; the resend cooldown is measured
    /// from here.
    pub requested_at:  DateTimeUtc,
    pub created_at:    DateTimeUtc,
    pub updated_at:    DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
