//! Role value objects.
//!
//! A [`RoleName`] is the human-facing label that also identifies the
//! distinguished administrator role, so comparison is case-insensitive on
//! the whitespace-trimmed form while serde round-trips keep the original
//! spelling.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::RoleId;

/// Validation errors returned by the [`RoleName`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleNameValidationError {
    /// The name was empty once trimmed of whitespace.
    Empty,
}

impl fmt::Display for RoleNameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "role name must not be empty"),
        }
    }
}

impl std::error::Error for RoleNameValidationError {}

/// Human readable role name.
///
/// ## Invariants
/// - Non-empty once trimmed of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Validate and construct a [`RoleName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, RoleNameValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RoleNameValidationError::Empty);
        }
        Ok(Self(name))
    }

    /// Construct without validation. Caller guarantees the input is
    /// non-blank; reserved for compile-time literals.
    pub(crate) fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive comparison on the whitespace-trimmed form.
    ///
    /// This is the match used to recognise the administrator role, so
    /// `"Administrator"`, `"administrator"`, and `" ADMINISTRATOR "` all
    /// identify the same role.
    #[must_use]
    pub fn matches_ignore_case(&self, other: &Self) -> bool {
        // Unicode lowercase rather than ASCII: role names are operator input
        // and may carry accented characters.
        self.0.trim().to_lowercase() == other.0.trim().to_lowercase()
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl TryFrom<String> for RoleName {
    type Error = RoleNameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A role a user can hold.
///
/// The descriptive name may be edited by the external CRUD layer; within
/// this crate roles are immutable snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Role {
    /// Stable role identifier.
    pub id: RoleId,
    /// Human readable role name.
    pub name: RoleName,
}

impl Role {
    /// Build a new [`Role`] from validated components.
    #[must_use]
    pub const fn new(id: RoleId, name: RoleName) -> Self {
        Self { id, name }
    }
}
