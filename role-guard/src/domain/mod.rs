//! Domain primitives and services for the role invariant guard.
//!
//! Purpose: strongly typed identifiers and value objects for users and
//! roles, the pure last-administrator decision logic, and the service that
//! enforces it in front of a persistence port. Types are immutable;
//! invariants and serde contracts are documented on each type.

pub mod config;
pub mod error;
pub mod ids;
pub mod invariant;
pub mod ports;
pub mod role;
pub mod role_assignment_service;

pub use self::config::GuardConfig;
pub use self::error::{ErrorCode, RoleAssignmentError};
pub use self::ids::{IdValidationError, RoleId, UserId};
pub use self::invariant::{AdminInvariantChecker, AdminStanding};
pub use self::role::{Role, RoleName, RoleNameValidationError};
pub use self::role_assignment_service::RoleAssignmentService;
