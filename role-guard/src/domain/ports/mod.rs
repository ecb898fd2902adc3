//! Domain ports for the hexagonal boundary.
//!
//! [`RoleStore`] is the driven port a host implements over its persistence
//! technology; [`RoleAssignmentCommand`] and [`RoleAssignmentQuery`] are the
//! driving ports the service exposes to inbound adapters.

mod role_assignment;
mod role_store;

pub use role_assignment::{RoleAssignmentCommand, RoleAssignmentQuery};
#[cfg(test)]
pub use role_store::MockRoleStore;
pub use role_store::{FixtureRoleStore, RoleStore, RoleStoreError};
