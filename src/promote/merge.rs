//! Field merge between a stored record and a generated draft.

use crate::models::ProjectRecord;
use crate::validation::ValidatedMetadata;

/// Merge generated fields into `existing`.
///
/// With `force` the generated value wins for every descriptive field.
/// Without it a stored value is kept unless it is absent, blank or an empty
/// list. Identity, stage and linkage always come from `existing`.
pub fn merge_metadata(
    existing: &ProjectRecord,
    incoming: &ValidatedMetadata,
    force: bool,
) -> ProjectRecord {
    ProjectRecord {
        name: pick_text(existing.name.as_deref(), &incoming.name, force),
        description: pick_text(existing.description.as_deref(), &incoming.description, force),
        tags: pick_list(&existing.tags, &incoming.tags, force),
        tech: pick_list(&existing.tech, &incoming.tech, force),
        category: match existing.category {
            Some(current) if !force => Some(current),
            _ => Some(incoming.category),
        },
        ..existing.clone()
    }
}

fn pick_text(existing: Option<&str>, incoming: &str, force: bool) -> Option<String> {
    match existing {
        Some(current) if !force && !current.trim().is_empty() => Some(current.to_string()),
        _ => Some(incoming.to_string()),
    }
}

fn pick_list(existing: &[String], incoming: &[String], force: bool) -> Vec<String> {
    if !force && !existing.is_empty() {
        existing.to_vec()
    } else {
        incoming.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, StageRole};

    fn incoming() -> ValidatedMetadata {
        ValidatedMetadata {
            name: "X".into(),
            description: "new".into(),
            tags: vec!["a".into()],
            tech: vec!["Rust".into()],
            category: Category::Tools,
        }
    }

    fn existing() -> ProjectRecord {
        ProjectRecord {
            name: Some("A".into()),
            description: Some("  ".into()),
            tags: vec![],
            ..ProjectRecord::new("QuickFox1234", StageRole::Playground)
        }
    }

    #[test]
    fn test_no_force_keeps_populated_fields() {
        let merged = merge_metadata(&existing(), &incoming(), false);
        assert_eq!(merged.name.as_deref(), Some("A"));
        assert_eq!(merged.description.as_deref(), Some("new"));
        assert_eq!(merged.tags, vec!["a"]);
        assert_eq!(merged.category, Some(Category::Tools));
    }

    #[test]
    fn test_force_overwrites() {
        let merged = merge_metadata(&existing(), &incoming(), true);
        assert_eq!(merged.name.as_deref(), Some("X"));
        assert_eq!(merged.description.as_deref(), Some("new"));
        assert_eq!(merged.tags, vec!["a"]);
        assert_eq!(merged.tech, vec!["Rust"]);
    }

    #[test]
    fn test_category_kept_without_force() {
        let mut record = existing();
        record.category = Some(Category::Games);
        assert_eq!(
            merge_metadata(&record, &incoming(), false).category,
            Some(Category::Games)
        );
        assert_eq!(
            merge_metadata(&record, &incoming(), true).category,
            Some(Category::Tools)
        );
    }

    #[test]
    fn test_identity_fields_untouched() {
        let record = existing();
        let merged = merge_metadata(&record, &incoming(), true);
        assert_eq!(merged.id, record.id);
        assert_eq!(merged.created_at, record.created_at);
        assert_eq!(merged.stage, record.stage);
        assert_eq!(merged.git, record.git);
        assert_eq!(merged.obsidian, record.obsidian);
    }
}
