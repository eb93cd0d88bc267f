//! Schema check for generated metadata drafts.

use serde_json::{Map, Value};

use crate::models::Category;

/// A generated draft that passed validation, with every field normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMetadata {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub tech: Vec<String>,
    pub category: Category,
}

/// Validate and normalize a draft.
///
/// Returns `None` for any schema violation; callers report a single generic
/// error rather than the specific field.
pub fn validate_payload(draft: &Value) -> Option<ValidatedMetadata> {
    let object = draft.as_object()?;

    let name = required_text(field(object, "name", "project_name")?)?;
    let description = required_text(object.get("description")?)?;
    let tags = string_list(object.get("tags")?)?;
    let tech = string_list(field(object, "tech", "tech_stack")?)?;
    let category = Category::normalize(object.get("category")?.as_str()?)?;

    Some(ValidatedMetadata {
        name,
        description,
        tags: tags
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect(),
        tech: tech
            .iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        category,
    })
}

/// Canonical key, or its alias when the canonical key is absent.
fn field<'a>(object: &'a Map<String, Value>, key: &str, alias: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| object.get(alias))
}

fn required_text(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn string_list(value: &Value) -> Option<Vec<&str>> {
    value.as_array()?.iter().map(Value::as_str).collect()
}
