//! In-memory `RoleStore` adapter.
//!
//! Reference implementation of the persistence port for tests and hosts
//! without durable storage. All tables live behind one async mutex, so each
//! port method is atomic and mutations from a single process serialise, as
//! the port contract requires.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ids::{RoleId, UserId};
use crate::domain::ports::{RoleStore, RoleStoreError};
use crate::domain::role::{Role, RoleName, RoleNameValidationError};

#[derive(Debug, Default)]
struct State {
    users: BTreeSet<UserId>,
    roles: BTreeMap<RoleId, Role>,
    assignments: BTreeMap<UserId, BTreeSet<RoleId>>,
}

/// In-memory [`RoleStore`] with seeding helpers for test setup.
#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    state: Mutex<State>,
}

impl InMemoryRoleStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a new user, returning its generated identifier.
    pub async fn add_user(&self) -> UserId {
        let user_id = UserId::random();
        let mut state = self.state.lock().await;
        state.users.insert(user_id);
        user_id
    }

    /// Seed a new role, returning its generated identifier.
    pub async fn add_role(&self, name: &str) -> Result<RoleId, RoleNameValidationError> {
        let name = RoleName::new(name)?;
        let role_id = RoleId::random();
        let mut state = self.state.lock().await;
        state.roles.insert(role_id, Role::new(role_id, name));
        Ok(role_id)
    }

    /// Seed a role assignment directly, bypassing the guard.
    ///
    /// Test setup only: production writers must go through the service.
    pub async fn assign(&self, user_id: &UserId, role_id: &RoleId) -> Result<(), RoleStoreError> {
        let mut state = self.state.lock().await;
        if !state.users.contains(user_id) {
            return Err(RoleStoreError::query(format!("unknown user {user_id}")));
        }
        if !state.roles.contains_key(role_id) {
            return Err(RoleStoreError::query(format!("unknown role {role_id}")));
        }
        state
            .assignments
            .entry(*user_id)
            .or_default()
            .insert(*role_id);
        Ok(())
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, RoleStoreError> {
        Ok(self.state.lock().await.users.contains(user_id))
    }

    async fn role_exists(&self, role_id: &RoleId) -> Result<bool, RoleStoreError> {
        Ok(self.state.lock().await.roles.contains_key(role_id))
    }

    async fn find_admin_role_id(
        &self,
        name: &RoleName,
    ) -> Result<Option<RoleId>, RoleStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .roles
            .values()
            .find(|role| role.name.matches_ignore_case(name))
            .map(|role| role.id))
    }

    async fn count_distinct_users_with_role(
        &self,
        role_id: &RoleId,
    ) -> Result<u64, RoleStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .assignments
            .values()
            .filter(|roles| roles.contains(role_id))
            .count() as u64)
    }

    async fn get_user_role_ids(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeSet<RoleId>, RoleStoreError> {
        let state = self.state.lock().await;
        Ok(state.assignments.get(user_id).cloned().unwrap_or_default())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, RoleStoreError> {
        Ok(self.state.lock().await.roles.values().cloned().collect())
    }

    async fn remove_user_roles(&self, user_id: &UserId) -> Result<u64, RoleStoreError> {
        let mut state = self.state.lock().await;
        let removed = state
            .assignments
            .remove(user_id)
            .map_or(0, |roles| roles.len());
        Ok(removed as u64)
    }

    async fn insert_user_role(
        &self,
        user_id: &UserId,
        role_id: &RoleId,
    ) -> Result<(), RoleStoreError> {
        let mut state = self.state.lock().await;
        if !state.users.contains(user_id) {
            return Err(RoleStoreError::query(format!("unknown user {user_id}")));
        }
        if !state.roles.contains_key(role_id) {
            return Err(RoleStoreError::query(format!("unknown role {role_id}")));
        }
        state
            .assignments
            .entry(*user_id)
            .or_default()
            .insert(*role_id);
        Ok(())
    }

    async fn delete_user(&self, user_id: &UserId) -> Result<(), RoleStoreError> {
        let mut state = self.state.lock().await;
        if !state.users.remove(user_id) {
            return Err(RoleStoreError::query(format!("unknown user {user_id}")));
        }
        state.assignments.remove(user_id);
        Ok(())
    }
}
