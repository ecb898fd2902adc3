//! Driven port for user/role persistence.
//!
//! The [`RoleStore`] trait is the only way the guard touches persisted
//! state. Adapters implement it over any storage technology; the service
//! never sees a connection or a table.

use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ids::{RoleId, UserId};
use crate::domain::role::{Role, RoleName};

/// Errors raised by role store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleStoreError {
    /// Store connection could not be established.
    #[error("role store connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// Query or mutation failed during execution.
    #[error("role store query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },

    /// The store operation timed out or was cancelled.
    #[error("role store operation timed out: {message}")]
    Timeout {
        /// Description of the timeout or cancellation.
        message: String,
    },
}

impl RoleStoreError {
    /// Connection-failure constructor.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query-failure constructor.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Timeout constructor.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }
}

/// Port for user, role, and role-assignment persistence.
///
/// Each method is atomic in itself. The replace protocol (remove all of a
/// user's assignments, then insert the new one) is driven by the service,
/// which also restores the prior assignments if the insert step fails.
///
/// # Isolation
///
/// Within one process all writers go through the service, which serialises
/// its check-then-act sequences. Deployments where several processes share
/// one store must provide equivalent isolation behind this port (a
/// serialisable transaction or a lock on the assignment table), otherwise
/// two concurrent demotions could each observe two administrators and
/// jointly remove both.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Does a user with this id exist?
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, RoleStoreError>;

    /// Does a role with this id exist?
    async fn role_exists(&self, role_id: &RoleId) -> Result<bool, RoleStoreError>;

    /// Resolve the role whose name matches `name` case-insensitively on the
    /// whitespace-trimmed form.
    ///
    /// Returns `None` when no such role is configured.
    async fn find_admin_role_id(
        &self,
        name: &RoleName,
    ) -> Result<Option<RoleId>, RoleStoreError>;

    /// Count the distinct users currently holding `role_id`.
    async fn count_distinct_users_with_role(
        &self,
        role_id: &RoleId,
    ) -> Result<u64, RoleStoreError>;

    /// The set of role ids currently assigned to `user_id`.
    ///
    /// Empty when the user holds no role; also empty for unknown users
    /// (existence is checked separately).
    async fn get_user_role_ids(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeSet<RoleId>, RoleStoreError>;

    /// Every role configured in the system.
    async fn list_roles(&self) -> Result<Vec<Role>, RoleStoreError>;

    /// Remove all of the user's role assignments, returning the number of
    /// assignments removed.
    async fn remove_user_roles(&self, user_id: &UserId) -> Result<u64, RoleStoreError>;

    /// Insert a single role assignment.
    async fn insert_user_role(
        &self,
        user_id: &UserId,
        role_id: &RoleId,
    ) -> Result<(), RoleStoreError>;

    /// Delete the user and, with it, any assignments the user held.
    async fn delete_user(&self, user_id: &UserId) -> Result<(), RoleStoreError>;
}

/// Fixture implementation for testing without a real store.
///
/// Behaves as a store with no users, no roles, and no administrator role
/// configured. Use it in unit tests where persistence behaviour is not
/// under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRoleStore;

#[async_trait]
impl RoleStore for FixtureRoleStore {
    async fn user_exists(&self, _user_id: &UserId) -> Result<bool, RoleStoreError> {
        Ok(false)
    }

    async fn role_exists(&self, _role_id: &RoleId) -> Result<bool, RoleStoreError> {
        Ok(false)
    }

    async fn find_admin_role_id(
        &self,
        _name: &RoleName,
    ) -> Result<Option<RoleId>, RoleStoreError> {
        Ok(None)
    }

    async fn count_distinct_users_with_role(
        &self,
        _role_id: &RoleId,
    ) -> Result<u64, RoleStoreError> {
        Ok(0)
    }

    async fn get_user_role_ids(
        &self,
        _user_id: &UserId,
    ) -> Result<BTreeSet<RoleId>, RoleStoreError> {
        Ok(BTreeSet::new())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, RoleStoreError> {
        Ok(Vec::new())
    }

    async fn remove_user_roles(&self, _user_id: &UserId) -> Result<u64, RoleStoreError> {
        Ok(0)
    }

    async fn insert_user_role(
        &self,
        _user_id: &UserId,
        _role_id: &RoleId,
    ) -> Result<(), RoleStoreError> {
        Ok(())
    }

    async fn delete_user(&self, _user_id: &UserId) -> Result<(), RoleStoreError> {
        Ok(())
    }
}
