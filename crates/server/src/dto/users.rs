//! User-facing view of an account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user fields exposed over the API; the password hash never leaves the
/// store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id:         String,
    pub first_name: String,
    pub last_name:  String,
    pub email:      String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::users::Model> for UserView {
    fn from(user: entity::users::Model) -> Self {
        Self {
            id:         user.id.to_string(),
            first_name: user.first_name,
            last_name:  user.last_name,
            email:      user.email,
            created_at: user.created_at,
        }
    }
}
