//! Driving ports for role assignment.
//!
//! Inbound adapters (an HTTP layer, an admin CLI) depend on these traits
//! rather than on the concrete service, keeping the guard mockable from the
//! host's side of the boundary.

use async_trait::async_trait;

use crate::domain::error::RoleAssignmentError;
use crate::domain::ids::{RoleId, UserId};
use crate::domain::role::Role;

/// Mutating role assignment operations.
///
/// Every successful call leaves the system with at least one administrator
/// whenever it had one before; every rejected call leaves role assignments
/// untouched.
#[async_trait]
pub trait RoleAssignmentCommand: Send + Sync {
    /// Atomically replace the user's current role assignments with the
    /// single role `new_role_id`.
    async fn reassign_role(
        &self,
        user_id: &UserId,
        new_role_id: &RoleId,
    ) -> Result<(), RoleAssignmentError>;

    /// Remove all of the user's role assignments.
    ///
    /// Idempotent: succeeds as a no-op when the user holds no role.
    async fn remove_role(&self, user_id: &UserId) -> Result<(), RoleAssignmentError>;

    /// Delete the user, rejecting the deletion when the user is the sole
    /// administrator.
    async fn delete_user(&self, user_id: &UserId) -> Result<(), RoleAssignmentError>;
}

/// Read-only role assignment queries.
#[async_trait]
pub trait RoleAssignmentQuery: Send + Sync {
    /// May the user be deleted without violating the administrator
    /// invariant? `Ok(false)` exactly when the user is the sole
    /// administrator.
    async fn can_delete_user(&self, user_id: &UserId) -> Result<bool, RoleAssignmentError>;

    /// The roles the user currently holds.
    async fn roles_for_user(&self, user_id: &UserId) -> Result<Vec<Role>, RoleAssignmentError>;

    /// The roles the user does not yet hold, for "add role" pickers.
    async fn assignable_roles_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Role>, RoleAssignmentError>;
}
