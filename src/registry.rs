//! Stage registry: role ↔ directory ↔ label.
//!
//! Built once from [`Settings`] at startup. Overrides must keep the mapping a
//! bijection, so two roles can never share a directory or a label.

use std::collections::{BTreeMap, HashMap};

use crate::config::Settings;
use crate::error::{Result, TrellisError};
use crate::models::StageRole;

#[derive(Debug, Clone)]
pub struct StageRegistry {
    dirs: BTreeMap<StageRole, String>,
    labels: BTreeMap<StageRole, String>,
}

impl Default for StageRegistry {
    fn default() -> Self {
        let dirs = StageRole::ALL
            .into_iter()
            .map(|role| (role, role.default_dir().to_string()))
            .collect();
        let labels = StageRole::ALL
            .into_iter()
            .map(|role| (role, role.key().to_string()))
            .collect();
        Self { dirs, labels }
    }
}

impl StageRegistry {
    /// Apply the directory and label overrides from `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut registry = Self::default();
        for (role, dir) in &settings.stage_dirs {
            registry.dirs.insert(*role, dir.trim().to_string());
        }
        for (role, label) in &settings.stage_labels {
            registry.labels.insert(*role, label.trim().to_string());
        }
        registry.check_bijection()?;
        Ok(registry)
    }

    fn check_bijection(&self) -> Result<()> {
        check_unique("directory", &self.dirs, false)?;
        check_unique("label", &self.labels, true)?;

        // A label must not shadow another role's canonical key.
        for (role, label) in &self.labels {
            if let Ok(other) = label.parse::<StageRole>() {
                if other != *role {
                    return Err(TrellisError::config(format!(
                        "Stage label '{label}' for {role} collides with the {other} stage"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Promotion-eligible roles in lifecycle order, optionally with the terminal role.
    pub fn roles(&self, include_terminal: bool) -> Vec<StageRole> {
        let mut roles = vec![
            StageRole::Playground,
            StageRole::Incubator,
            StageRole::Product,
            StageRole::Tool,
        ];
        if include_terminal {
            roles.push(StageRole::Archive);
        }
        roles
    }

    /// Every registered role.
    pub fn all_roles(&self) -> Vec<StageRole> {
        self.dirs.keys().copied().collect()
    }

    pub fn directory_for(&self, role: StageRole) -> Result<&str> {
        self.dirs
            .get(&role)
            .map(String::as_str)
            .ok_or_else(|| TrellisError::UnknownRole(role.key().to_string()))
    }

    pub fn label_for(&self, role: StageRole) -> Result<&str> {
        self.labels
            .get(&role)
            .map(String::as_str)
            .ok_or_else(|| TrellisError::UnknownRole(role.key().to_string()))
    }

    /// Resolve a canonical key or display label, case-insensitive and trimmed.
    pub fn role_from_label(&self, text: &str) -> Option<StageRole> {
        let wanted = text.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        if let Ok(role) = wanted.parse::<StageRole>() {
            if self.labels.contains_key(&role) {
                return Some(role);
            }
        }
        self.labels
            .iter()
            .find(|(_, label)| label.to_lowercase() == wanted)
            .map(|(role, _)| *role)
    }

    /// Like [`role_from_label`](Self::role_from_label) but fails with `UnknownRole`.
    pub fn parse_role(&self, text: &str) -> Result<StageRole> {
        self.role_from_label(text)
            .ok_or_else(|| TrellisError::UnknownRole(text.trim().to_string()))
    }

    /// Labels accepted on the command line for `roles`, keys included.
    pub fn choices(&self, roles: &[StageRole]) -> Vec<String> {
        let mut choices = Vec::new();
        for role in roles {
            if let Some(label) = self.labels.get(role) {
                choices.push(label.clone());
            }
            if !choices.iter().any(|c| c == role.key()) {
                choices.push(role.key().to_string());
            }
        }
        choices
    }
}

fn check_unique(
    what: &str,
    values: &BTreeMap<StageRole, String>,
    case_insensitive: bool,
) -> Result<()> {
    let mut seen: HashMap<String, StageRole> = HashMap::new();
    for (role, value) in values {
        if value.is_empty() {
            return Err(TrellisError::config(format!("Empty stage {what} for {role}")));
        }
        let key = if case_insensitive {
            value.to_lowercase()
        } else {
            value.clone()
        };
        if let Some(previous) = seen.insert(key, *role) {
            return Err(TrellisError::config(format!(
                "Stage {what} '{value}' is used by both {previous} and {role}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with(dirs: &[(StageRole, &str)], labels: &[(StageRole, &str)]) -> Settings {
        let mut settings = Settings::for_root("/projects");
        for (role, dir) in dirs {
            settings.stage_dirs.insert(*role, dir.to_string());
        }
        for (role, label) in labels {
            settings.stage_labels.insert(*role, label.to_string());
        }
        settings
    }

    #[test]
    fn test_defaults() {
        let registry = StageRegistry::default();
        assert_eq!(registry.directory_for(StageRole::Product).unwrap(), "products");
        assert_eq!(registry.directory_for(StageRole::Archive).unwrap(), "archives");
        assert_eq!(registry.label_for(StageRole::Tool).unwrap(), "tool");
    }

    #[test]
    fn test_roles_terminal_flag() {
        let registry = StageRegistry::default();
        assert_eq!(registry.roles(false).len(), 4);
        assert_eq!(registry.roles(true).last(), Some(&StageRole::Archive));
        assert!(!registry.roles(true).contains(&StageRole::Resources));
    }

    #[test]
    fn test_role_from_label_accepts_key_and_label() {
        let settings = settings_with(&[], &[(StageRole::Playground, "Sandbox")]);
        let registry = StageRegistry::from_settings(&settings).unwrap();
        assert_eq!(registry.role_from_label(" sandbox "), Some(StageRole::Playground));
        assert_eq!(registry.role_from_label("PLAYGROUND"), Some(StageRole::Playground));
        assert_eq!(registry.role_from_label("incubator"), Some(StageRole::Incubator));
        assert_eq!(registry.role_from_label("nowhere"), None);
        assert_eq!(registry.role_from_label(""), None);
    }

    #[test]
    fn test_directory_override() {
        let settings = settings_with(&[(StageRole::Incubator, "develop")], &[]);
        let registry = StageRegistry::from_settings(&settings).unwrap();
        assert_eq!(registry.directory_for(StageRole::Incubator).unwrap(), "develop");
    }

    #[test]
    fn test_duplicate_directory_rejected() {
        let settings = settings_with(&[(StageRole::Product, "tools")], &[]);
        let err = StageRegistry::from_settings(&settings).unwrap_err();
        assert!(matches!(err, TrellisError::Config { .. }));
    }

    #[test]
    fn test_duplicate_label_rejected_case_insensitive() {
        let settings = settings_with(
            &[],
            &[(StageRole::Product, "Shipped"), (StageRole::Tool, "shipped")],
        );
        assert!(StageRegistry::from_settings(&settings).is_err());
    }

    #[test]
    fn test_label_shadowing_key_rejected() {
        let settings = settings_with(&[], &[(StageRole::Product, "tool")]);
        assert!(StageRegistry::from_settings(&settings).is_err());
    }

    #[test]
    fn test_parse_role_unknown() {
        let registry = StageRegistry::default();
        assert!(matches!(
            registry.parse_role("garage"),
            Err(TrellisError::UnknownRole(_))
        ));
    }
}
