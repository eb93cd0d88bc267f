use serde_json::{json, Value};

use super::MetadataGenerator;
use crate::context::{ContextSummary, UNKNOWN};
use crate::error::Result;

/// Offline generator that derives a draft from the detected languages.
///
/// The same context always yields the same draft.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubGenerator;

impl MetadataGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    fn generate(&self, context: &ContextSummary) -> Result<Value> {
        let base = context
            .languages
            .first()
            .map(|l| l.to_lowercase())
            .unwrap_or_else(|| "project".to_string());
        let tech: Vec<String> = context
            .languages
            .iter()
            .filter(|l| l.as_str() != UNKNOWN)
            .map(|l| capitalize(l))
            .collect();

        Ok(json!({
            "name": format!("{base}-prototype"),
            "description": "Auto-generated project description.",
            "tags": ["prototype", "trellis", base],
            "tech": tech,
            "category": "Tools",
        }))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
