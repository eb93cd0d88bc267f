//! Input validation.
//!
//! Project ids end up as directory names, so user-supplied ids are checked
//! before they are joined onto any stage path. Generated metadata drafts are
//! checked in [`payload`].

pub mod payload;

pub use payload::{validate_payload, ValidatedMetadata};

use crate::error::{Result, TrellisError};

/// Maximum allowed length for project ids.
pub const MAX_ID_LENGTH: usize = 128;

/// Reserved names that cannot be used as ids (case-insensitive).
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
    "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validates that a project id is safe to use as a directory name.
///
/// An id is valid if it is non-empty, at most [`MAX_ID_LENGTH`] characters,
/// made of ASCII letters, digits, dashes, underscores and dots, does not start
/// with a dot, and is not a reserved system name.
///
/// ```
/// use trellis::validation::validate_project_id;
///
/// assert!(validate_project_id("widget-tool").is_ok());
/// assert!(validate_project_id("BraveOtter4821").is_ok());
/// assert!(validate_project_id("../etc").is_err());
/// ```
pub fn validate_project_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(TrellisError::usage("Project id cannot be empty"));
    }

    if id.chars().count() > MAX_ID_LENGTH {
        return Err(TrellisError::usage(format!(
            "Project id too long: {} characters (max {MAX_ID_LENGTH})",
            id.chars().count()
        )));
    }

    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid_chars || id.starts_with('.') {
        return Err(TrellisError::usage(format!(
            "Project id '{id}' contains invalid characters. Use letters, digits, dashes (-), underscores (_) and dots (.)"
        )));
    }

    if RESERVED_NAMES.contains(&id.to_lowercase().as_str()) {
        return Err(TrellisError::usage(format!("Project id '{id}' uses a reserved name")));
    }

    Ok(())
}

/// Clap value parser for project id arguments.
pub fn clap_id_validator(s: &str) -> std::result::Result<String, String> {
    validate_project_id(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}
