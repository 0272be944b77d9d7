use crate::types::{AppError, Result};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Only the recorded owner of a resource may mutate it.
pub fn authorize(acting: Uuid, owner: Uuid) -> Access {
    if acting == owner {
        Access::Allow
    } else {
        Access::Deny
    }
}

/// [`authorize`], surfacing `Deny` as [`AppError::Forbidden`].
pub fn require_owner(acting: Uuid, owner: Uuid) -> Result<()> {
    match authorize(acting, owner) {
        Access::Allow => Ok(()),
        Access::Deny => {
            tracing::debug!(%acting, %owner, "ownership check denied");
            Err(AppError::Forbidden)
        }
    }
}
