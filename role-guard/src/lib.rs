//! Last-administrator invariant guard for user/role management subsystems.
//!
//! A user-management layer that lets operators reassign or remove roles can
//! silently lock everyone out: demoting the only administrator leaves the
//! system with nobody able to administer it. This crate extracts that rule
//! into a small, reusable service which a host application consults before
//! committing any role mutation.
//!
//! # Overview
//!
//! The crate is organised as a hexagonal core:
//!
//! - [`domain::AdminInvariantChecker`] — the pure decision function: would a
//!   proposed mutation leave zero administrators?
//! - [`domain::RoleAssignmentService`] — orchestrates atomic role
//!   replacement, role removal, and guarded user deletion through a
//!   persistence port.
//! - [`domain::ports::RoleStore`] — the driven port a host implements over
//!   its own storage technology.
//! - [`outbound::InMemoryRoleStore`] — a reference adapter for tests and
//!   hosts without durable storage.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use role_guard::domain::ports::RoleAssignmentCommand;
//! use role_guard::domain::{GuardConfig, RoleAssignmentError, RoleAssignmentService};
//! use role_guard::outbound::InMemoryRoleStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(InMemoryRoleStore::new());
//! let admin = store.add_role("Administrator").await.expect("valid role name");
//! let volunteer = store.add_role("Volunteer").await.expect("valid role name");
//! let alice = store.add_user().await;
//! store.assign(&alice, &admin).await.expect("seed assignment");
//!
//! let service = RoleAssignmentService::new(store, GuardConfig::default());
//!
//! // Alice is the sole administrator, so demotion is rejected.
//! let outcome = service.reassign_role(&alice, &volunteer).await;
//! assert!(matches!(outcome, Err(RoleAssignmentError::LastAdminProtected)));
//! # }
//! ```

pub mod domain;
pub mod outbound;
