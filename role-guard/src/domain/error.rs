//! Service-level error taxonomy.
//!
//! These errors are transport agnostic. A host HTTP layer maps them to
//! responses: `UserNotFound` to 404, `RoleNotFound` to 400,
//! `LastAdminProtected` to 409, `Storage` to 500. The stable [`ErrorCode`]
//! supports that mapping without string matching.

use serde::Serialize;
use thiserror::Error;

use super::ids::{RoleId, UserId};
use super::ports::RoleStoreError;

/// Stable machine-readable code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The referenced user does not exist.
    UserNotFound,
    /// The referenced role does not exist.
    RoleNotFound,
    /// The mutation would remove the last administrator.
    LastAdminProtected,
    /// The underlying store failed.
    StorageFailure,
}

/// Errors returned by the role assignment operations.
///
/// `LastAdminProtected` is an expected business-rule rejection, not a bug:
/// callers surface it to the operator and never retry automatically.
/// `Storage` may be retried by the caller; rollback has already completed
/// (or been attempted and logged) by the time it is returned, so the user's
/// role assignments are unchanged from before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleAssignmentError {
    /// No user exists with the given identifier.
    #[error("no user exists with id {user_id}")]
    UserNotFound {
        /// Identifier that failed the existence check.
        user_id: UserId,
    },

    /// No role exists with the given identifier.
    #[error("no role exists with id {role_id}")]
    RoleNotFound {
        /// Identifier that failed the existence check.
        role_id: RoleId,
    },

    /// The mutation would leave the system without any administrator.
    #[error("cannot change role: the user is the only administrator in the system")]
    LastAdminProtected,

    /// The underlying store failed; the mutation was rolled back.
    #[error("role store failure: {0}")]
    Storage(#[from] RoleStoreError),
}

impl RoleAssignmentError {
    /// Stable machine-readable error code for transport adapters.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UserNotFound { .. } => ErrorCode::UserNotFound,
            Self::RoleNotFound { .. } => ErrorCode::RoleNotFound,
            Self::LastAdminProtected => ErrorCode::LastAdminProtected,
            Self::Storage(_) => ErrorCode::StorageFailure,
        }
    }
}
