//! Guard configuration.
//!
//! The distinguished administrator role is identified by name. Hosts inject
//! the identifier once at service construction instead of scattering a
//! magic string through call sites; the default matches the conventional
//! `"administrator"` role label.

use serde::Deserialize;

use super::role::RoleName;

/// Configuration for [`RoleAssignmentService`].
///
/// Deserialisable so host applications can source it from their own
/// configuration layer.
///
/// [`RoleAssignmentService`]: super::RoleAssignmentService
///
/// # Examples
/// ```
/// use role_guard::domain::{GuardConfig, RoleName};
///
/// let config = GuardConfig::default();
/// let conventional = RoleName::new("Administrator").expect("valid name");
/// assert!(config.administrator_role().matches_ignore_case(&conventional));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    #[serde(default = "default_administrator_role")]
    administrator_role: RoleName,
}

fn default_administrator_role() -> RoleName {
    RoleName::new_unchecked("administrator")
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            administrator_role: default_administrator_role(),
        }
    }
}

impl GuardConfig {
    /// Override the administrator role identifier.
    #[must_use]
    pub fn with_administrator_role(mut self, name: RoleName) -> Self {
        self.administrator_role = name;
        self
    }

    /// Name identifying the distinguished administrator role.
    #[must_use]
    pub const fn administrator_role(&self) -> &RoleName {
        &self.administrator_role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_config_uses_conventional_role_name() {
        let config = GuardConfig::default();
        assert_eq!(config.administrator_role().as_ref(), "administrator");
    }

    #[rstest]
    fn override_replaces_the_role_identifier() {
        let config = GuardConfig::default()
            .with_administrator_role(RoleName::new("superuser").expect("valid name"));
        assert_eq!(config.administrator_role().as_ref(), "superuser");
    }

    #[rstest]
    fn deserialises_from_camel_case_json() {
        let config: GuardConfig =
            serde_json::from_str(r#"{"administratorRole": "Administrador"}"#)
                .expect("valid config document");
        assert_eq!(config.administrator_role().as_ref(), "Administrador");
    }

    #[rstest]
    fn missing_field_falls_back_to_default() {
        let config: GuardConfig = serde_json::from_str("{}").expect("valid config document");
        assert_eq!(config, GuardConfig::default());
    }

    #[rstest]
    fn unknown_fields_are_rejected() {
        let result: Result<GuardConfig, _> = serde_json::from_str(r#"{"adminRole": "x"}"#);
        assert!(result.is_err());
    }
}
