//! Access policy
//!
//! Every core operation receives the caller's identity explicitly. A missing
//! identity is `Unauthorized`; an identity with the wrong role is `Forbidden`.

use crate::{
    error::{AppError, AppResult},
    models::{Identity, Role},
};

pub struct AccessPolicy;

impl AccessPolicy {
    /// Any signed-in caller
    pub fn authenticated(identity: Option<&Identity>) -> AppResult<&Identity> {
        identity.ok_or(AppError::Unauthorized)
    }

    pub fn require_role(identity: Option<&Identity>, role: Role) -> AppResult<&Identity> {
        let identity = Self::authenticated(identity)?;
        if identity.role != role {
            return Err(AppError::Forbidden(format!("{} access required", role)));
        }
        Ok(identity)
    }

    pub fn require_admin(identity: Option<&Identity>) -> AppResult<&Identity> {
        Self::require_role(identity, Role::Admin)
    }

    pub fn require_donor(identity: Option<&Identity>) -> AppResult<&Identity> {
        Self::require_role(identity, Role::Donor)
    }
}
