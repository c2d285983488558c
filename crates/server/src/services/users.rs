//! User detail lookup.

use error::{DomainError, Result, ServiceResult};
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, dto::users::UserView, store};

/// Fetch the profile of a user by id (the authenticated subject).
pub async fn get_user_details(state: &AppState, urid: Option<String>, user_id: &str) -> Result<ServiceResult<UserView>> {
    let Ok(id) = Uuid::parse_str(user_id) else {
        debug!("User lookup with malformed id");
        return Ok(ServiceResult::rejected(urid, DomainError::UserDoesNotExist));
    };

    match store::users::find_by_id(&state.db, id).await? {
        Some(user) => Ok(ServiceResult::ok(urid, user.into())),
        None => {
            debug!("User lookup found nothing");
            Ok(ServiceResult::rejected(urid, DomainError::UserDoesNotExist))
        },
    }
}
