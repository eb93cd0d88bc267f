use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle stage of a project.
///
/// Promotion order:
/// - `Playground` -> `Incubator` (entry stage, AI description happens here)
/// - `Incubator` -> `Product` | `Tool`
/// - `Product` | `Tool` -> `Archive`
/// - `Resources` holds reference material and can only be archived
/// - `Archive` is a terminal state
///
/// Directory names and display labels are not fixed here; they come from
/// [`crate::registry::StageRegistry`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum StageRole {
    Playground,
    Incubator,
    Product,
    Tool,
    Resources,
    Archive,
}

impl StageRole {
    /// Every role, in lifecycle order.
    pub const ALL: [StageRole; 6] = [
        StageRole::Playground,
        StageRole::Incubator,
        StageRole::Product,
        StageRole::Tool,
        StageRole::Resources,
        StageRole::Archive,
    ];

    /// Canonical key, as written to `project.yaml`.
    pub const fn key(&self) -> &'static str {
        match self {
            StageRole::Playground => "playground",
            StageRole::Incubator => "incubator",
            StageRole::Product => "product",
            StageRole::Tool => "tool",
            StageRole::Resources => "resources",
            StageRole::Archive => "archive",
        }
    }

    /// Built-in storage directory name.
    pub const fn default_dir(&self) -> &'static str {
        match self {
            StageRole::Playground => "playground",
            StageRole::Incubator => "incubator",
            StageRole::Product => "products",
            StageRole::Tool => "tools",
            StageRole::Resources => "resources",
            StageRole::Archive => "archives",
        }
    }

    /// Suffix used by the `TRELLIS_STAGE_<ROLE>_DIR` / `_LABEL` overrides.
    pub fn env_suffix(&self) -> String {
        self.key().to_uppercase()
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, StageRole::Archive)
    }
}

impl fmt::Display for StageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Error for parsing [`StageRole`] from a canonical key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown stage role: '{0}'")]
pub struct ParseStageRoleError(pub String);

impl FromStr for StageRole {
    type Err = ParseStageRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        StageRole::ALL
            .into_iter()
            .find(|role| role.key() == key)
            .ok_or_else(|| ParseStageRoleError(s.to_string()))
    }
}
