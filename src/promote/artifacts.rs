//! Files synthesized into a promoted project.

use anyhow::Context;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::ProjectRecord;

pub const README_FILE: &str = "README.md";
pub const NOTE_FILE: &str = "obsidian.md";

/// README body built from the record.
pub fn render_readme(record: &ProjectRecord) -> String {
    let mut lines = vec![format!("# {}", record.display_name()), String::new()];
    if let Some(description) = record.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(description.to_string());
        lines.push(String::new());
    }
    if let Some(category) = record.category {
        lines.push("## Category".to_string());
        lines.push(category.to_string());
        lines.push(String::new());
    }
    if !record.tags.is_empty() {
        lines.push("## Tags".to_string());
        lines.extend(record.tags.iter().map(|tag| format!("- {tag}")));
        lines.push(String::new());
    }
    if !record.tech.is_empty() {
        lines.push("## Tech".to_string());
        lines.extend(record.tech.iter().map(|item| format!("- {item}")));
        lines.push(String::new());
    }
    format!("{}\n", lines.join("\n").trim())
}

/// Write `README.md` unless one exists; returns whether it was written.
pub fn write_readme(project_dir: &Path, record: &ProjectRecord) -> Result<bool> {
    let path = project_dir.join(README_FILE);
    if path.exists() {
        return Ok(false);
    }
    fs::write(&path, render_readme(record))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

/// Write the note file with front matter linking it to the project id.
pub fn write_note(project_dir: &Path, id: &str) -> Result<()> {
    let path = project_dir.join(NOTE_FILE);
    fs::write(&path, format!("---\nproject: {id}\n---\n\n# {id}\n"))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
