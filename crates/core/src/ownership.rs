//! Owner checks applied before any read or mutation of a user-owned row.

use crate::error::CoreError;
use crate::types::DbId;

/// Fail with [`CoreError::Forbidden`] unless `owner_id` is `user_id`.
pub fn ensure_owner(entity: &'static str, id: DbId, owner_id: DbId, user_id: DbId) -> Result<(), CoreError> {
    if owner_id == user_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "{entity} {id} does not belong to the current user"
        )))
    }
}
