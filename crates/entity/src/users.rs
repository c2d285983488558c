//! Users Entity
//!
//! Account records. Created on signup; `password_hash` is the only column the
//! auth flows ever mutate. Rows are never deleted by any flow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:            Uuid,
    pub first_name:    String,
    pub last_name:     String,
    #[sea_orm(unique)]
    pub email:         String,
    pub password_hash: String,
    pub created_at:    DateTimeUtc,
    pub updated_at:    DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::password_reset_requests::Entity")]
    PasswordResetRequests,
}

impl Related<super::password_reset_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PasswordResetRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
