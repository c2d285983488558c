//! Password Reset Requests Entity
//!
//! Append-style ledger: one row per issued reset OTP. The most recent row for
//! a user is the one that drives throttle and verification decisions. Rows
//! are never deleted; consuming or superseding an OTP flips `is_otp_usable`.
//!
//! The OTP itself is stored argon2-hashed — this flow never re-sends an
//! existing OTP, so the plaintext is not needed after delivery.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:            Uuid,
    pub user_id:       Uuid,
    pub email:         String,
    pub request_ip:    Option<String>,
    /// When this OTP was issued; both throttling and validity are measured
    /// from here.
    pub requested_at:  DateTimeUtc,
    pub otp_hash:      String,
    pub is_otp_usable: bool,
    pub created_at:    DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
