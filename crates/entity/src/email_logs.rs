//! Email Logs Entity
//!
//! One row per outbound email the SMTP relay accepted, written inside the
//! same transaction scope as the flow that sent it. `user_id` is null for
//! mail addressed to identities that have no account yet (verification OTPs).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "email_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                  Uuid,
    pub user_id:             Option<Uuid>,
    pub provider_message_id: Option<String>,
    pub sender:              String,
    pub recipient:           String,
    pub subject:             String,
    pub body_type:           EmailBodyType,
    pub body:                String,
    pub created_at:          DateTimeUtc,
}

/// Body encoding of a logged email.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum EmailBodyType {
    #[sea_orm(string_value = "text")]
    Text,
    #[sea_orm(string_value = "html")]
    Html,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
