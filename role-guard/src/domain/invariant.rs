//! Pure last-administrator decision logic.
//!
//! Once at least one administrator exists, every role mutation must leave at
//! least one user holding the administrator role. The checker evaluates a
//! proposed mutation against the current persisted counts; it holds no state
//! and performs no I/O, so the rule is trivially unit-testable.

/// Pure decision function guarding the last-administrator invariant.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminInvariantChecker;

impl AdminInvariantChecker {
    /// Would the proposed mutation leave the system without administrators?
    ///
    /// Returns `true` (the mutation must be rejected) exactly when the
    /// target currently holds the administrator role, the proposed state
    /// drops it, and the target is the only administrator. Every other
    /// combination is allowed, including counts of zero: with no
    /// administrators the invariant has never been established.
    #[must_use]
    pub const fn would_violate_invariant(
        &self,
        current_admin_count: u64,
        is_target_currently_admin: bool,
        is_target_becoming_admin: bool,
    ) -> bool {
        is_target_currently_admin && !is_target_becoming_admin && current_admin_count == 1
    }
}

/// A user's standing with respect to the administrator role.
///
/// Re-derived fresh from persisted counts on every mutation; no state
/// machine object is stored. The only forbidden transition is
/// `SoleAdmin` dropping the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminStanding {
    /// The user does not hold the administrator role.
    NonAdmin,
    /// The user is the only administrator in the system.
    SoleAdmin,
    /// The user is an administrator, and others exist.
    AdminAmongOthers,
}

impl AdminStanding {
    /// Classify a user from their role membership and the current
    /// distinct-administrator count.
    #[must_use]
    pub const fn classify(holds_admin_role: bool, current_admin_count: u64) -> Self {
        if !holds_admin_role {
            Self::NonAdmin
        } else if current_admin_count == 1 {
            Self::SoleAdmin
        } else {
            Self::AdminAmongOthers
        }
    }

    /// May a user with this standing be deleted without violating the
    /// invariant?
    #[must_use]
    pub const fn permits_deletion(self) -> bool {
        !matches!(self, Self::SoleAdmin)
    }
}
