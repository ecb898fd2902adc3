//! Role assignment domain service.
//!
//! Orchestrates atomic role replacement, role removal, and guarded user
//! deletion for one user at a time, consulting the last-administrator
//! checker before any commit. The service is the single writer for role
//! assignments; direct store writes bypassing it are out of contract.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::config::GuardConfig;
use crate::domain::error::RoleAssignmentError;
use crate::domain::ids::{RoleId, UserId};
use crate::domain::invariant::{AdminInvariantChecker, AdminStanding};
use crate::domain::ports::{RoleAssignmentCommand, RoleAssignmentQuery, RoleStore};
use crate::domain::role::Role;

/// Service enforcing the last-administrator invariant in front of a
/// [`RoleStore`].
///
/// The administrator role identifier is resolved from [`GuardConfig`] once
/// at construction; the role *id* is looked up per call because the role may
/// be created (or renamed away) while the service is running — enforcement
/// switches on as soon as the role exists.
///
/// Mutating operations serialise their check-then-act sequence behind an
/// internal mutation guard, so the admin-count check and the subsequent
/// commit cannot interleave with another mutation from this service.
pub struct RoleAssignmentService<S> {
    store: Arc<S>,
    config: GuardConfig,
    checker: AdminInvariantChecker,
    mutation_guard: Mutex<()>,
}

impl<S> RoleAssignmentService<S> {
    /// Create a new service over the given store.
    #[must_use]
    pub fn new(store: Arc<S>, config: GuardConfig) -> Self {
        Self {
            store,
            config,
            checker: AdminInvariantChecker,
            mutation_guard: Mutex::new(()),
        }
    }
}

impl<S> RoleAssignmentService<S>
where
    S: RoleStore,
{
    async fn ensure_user_exists(&self, user_id: &UserId) -> Result<(), RoleAssignmentError> {
        if self.store.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(RoleAssignmentError::UserNotFound { user_id: *user_id })
        }
    }

    async fn ensure_role_exists(&self, role_id: &RoleId) -> Result<(), RoleAssignmentError> {
        if self.store.role_exists(role_id).await? {
            Ok(())
        } else {
            Err(RoleAssignmentError::RoleNotFound { role_id: *role_id })
        }
    }

    /// Reject the mutation when it would demote the last administrator.
    ///
    /// With no administrator role configured there is no invariant to
    /// enforce and the check is skipped entirely.
    async fn check_invariant(
        &self,
        user_id: &UserId,
        current_roles: &BTreeSet<RoleId>,
        becoming_role: Option<&RoleId>,
    ) -> Result<(), RoleAssignmentError> {
        let Some(admin_role_id) = self
            .store
            .find_admin_role_id(self.config.administrator_role())
            .await?
        else {
            return Ok(());
        };

        let is_currently_admin = current_roles.contains(&admin_role_id);
        let is_becoming_admin = becoming_role == Some(&admin_role_id);
        if !is_currently_admin {
            // Only a current administrator can be demoted; skip the count
            // query for everyone else.
            return Ok(());
        }

        let admin_count = self
            .store
            .count_distinct_users_with_role(&admin_role_id)
            .await?;
        if self
            .checker
            .would_violate_invariant(admin_count, is_currently_admin, is_becoming_admin)
        {
            tracing::warn!(
                %user_id,
                admin_count,
                "mutation rejected: user is the last administrator"
            );
            return Err(RoleAssignmentError::LastAdminProtected);
        }
        Ok(())
    }

    /// Remove all prior assignments and insert the new one, restoring the
    /// prior assignments if the insert step fails.
    async fn replace_roles(
        &self,
        user_id: &UserId,
        new_role_id: &RoleId,
        prior_roles: &BTreeSet<RoleId>,
    ) -> Result<(), RoleAssignmentError> {
        self.store.remove_user_roles(user_id).await?;

        if let Err(insert_err) = self.store.insert_user_role(user_id, new_role_id).await {
            self.restore_roles(user_id, prior_roles).await;
            return Err(insert_err.into());
        }
        Ok(())
    }

    /// Best-effort rollback: re-insert the assignments held before a failed
    /// replace so the user is never left role-less by a partial failure.
    async fn restore_roles(&self, user_id: &UserId, prior_roles: &BTreeSet<RoleId>) {
        for role_id in prior_roles {
            if let Err(restore_err) = self.store.insert_user_role(user_id, role_id).await {
                tracing::error!(
                    %user_id,
                    %role_id,
                    error = %restore_err,
                    "rollback failed: prior role assignment could not be restored"
                );
            }
        }
    }

    /// Classify the user's standing with respect to the administrator role,
    /// evaluated fresh from current persisted counts.
    async fn admin_standing(&self, user_id: &UserId) -> Result<AdminStanding, RoleAssignmentError> {
        let Some(admin_role_id) = self
            .store
            .find_admin_role_id(self.config.administrator_role())
            .await?
        else {
            return Ok(AdminStanding::NonAdmin);
        };

        let holds_admin_role = self
            .store
            .get_user_role_ids(user_id)
            .await?
            .contains(&admin_role_id);
        if !holds_admin_role {
            return Ok(AdminStanding::NonAdmin);
        }

        let admin_count = self
            .store
            .count_distinct_users_with_role(&admin_role_id)
            .await?;
        Ok(AdminStanding::classify(true, admin_count))
    }
}

#[async_trait]
impl<S> RoleAssignmentCommand for RoleAssignmentService<S>
where
    S: RoleStore,
{
    async fn reassign_role(
        &self,
        user_id: &UserId,
        new_role_id: &RoleId,
    ) -> Result<(), RoleAssignmentError> {
        let _guard = self.mutation_guard.lock().await;

        self.ensure_user_exists(user_id).await?;
        self.ensure_role_exists(new_role_id).await?;

        let current_roles = self.store.get_user_role_ids(user_id).await?;
        self.check_invariant(user_id, &current_roles, Some(new_role_id))
            .await?;
        self.replace_roles(user_id, new_role_id, &current_roles)
            .await
    }

    async fn remove_role(&self, user_id: &UserId) -> Result<(), RoleAssignmentError> {
        let _guard = self.mutation_guard.lock().await;

        self.ensure_user_exists(user_id).await?;

        let current_roles = self.store.get_user_role_ids(user_id).await?;
        if current_roles.is_empty() {
            tracing::debug!(%user_id, "remove_role is a no-op: user holds no role");
            return Ok(());
        }

        self.check_invariant(user_id, &current_roles, None).await?;
        self.store.remove_user_roles(user_id).await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: &UserId) -> Result<(), RoleAssignmentError> {
        let _guard = self.mutation_guard.lock().await;

        self.ensure_user_exists(user_id).await?;

        let standing = self.admin_standing(user_id).await?;
        if !standing.permits_deletion() {
            tracing::warn!(%user_id, "deletion rejected: user is the last administrator");
            return Err(RoleAssignmentError::LastAdminProtected);
        }

        self.store.delete_user(user_id).await?;
        Ok(())
    }
}

#[async_trait]
impl<S> RoleAssignmentQuery for RoleAssignmentService<S>
where
    S: RoleStore,
{
    async fn can_delete_user(&self, user_id: &UserId) -> Result<bool, RoleAssignmentError> {
        self.ensure_user_exists(user_id).await?;
        Ok(self.admin_standing(user_id).await?.permits_deletion())
    }

    async fn roles_for_user(&self, user_id: &UserId) -> Result<Vec<Role>, RoleAssignmentError> {
        self.ensure_user_exists(user_id).await?;

        let held = self.store.get_user_role_ids(user_id).await?;
        let roles = self.store.list_roles().await?;
        Ok(roles
            .into_iter()
            .filter(|role| held.contains(&role.id))
            .collect())
    }

    async fn assignable_roles_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Role>, RoleAssignmentError> {
        self.ensure_user_exists(user_id).await?;

        let held = self.store.get_user_role_ids(user_id).await?;
        let roles = self.store.list_roles().await?;
        Ok(roles
            .into_iter()
            .filter(|role| !held.contains(&role.id))
            .collect())
    }
}
