//! `project.yaml` reader and writer.
//!
//! The file uses a fixed, YAML-compatible subset:
//!
//! ```text
//! id: widget-tool
//! stage: incubator
//! name: Widget Tool
//! description: A tool for widgets.
//! tags: [cli, widgets]
//! tech: [Rust]
//! created_at: 2024-05-01T09:30:00Z
//! category: Tools
//! git:
//!   enabled: true
//!   repo: https://github.com/me/widget-tool
//! obsidian:
//!   enabled: false
//! ```
//!
//! A `key:` line with no value opens a section; indented lines belong to the
//! open section. Lines without a colon are ignored. Text that would read back
//! as null, a boolean or a list is written in quotes, as are list items holding
//! a comma or a quote. This is not a YAML parser
//! and only round-trips what [`write_record`] produces.

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Result, TrellisError};
use crate::models::{Category, GitLink, NoteLink, ProjectRecord, StageRole, RECORD_FILE};
use crate::registry::StageRegistry;
use crate::utils::single_line;

/// Decoded right-hand side of a `key: value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scalar {
    Null,
    Bool(bool),
    List(Vec<String>),
    Text(String),
}

impl Scalar {
    fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value.is_empty() || value == "null" {
            return Scalar::Null;
        }
        if value.eq_ignore_ascii_case("true") {
            return Scalar::Bool(true);
        }
        if value.eq_ignore_ascii_case("false") {
            return Scalar::Bool(false);
        }
        if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            let inner = inner.trim();
            if inner.is_empty() {
                return Scalar::List(Vec::new());
            }
            return Scalar::List(split_items(inner));
        }
        Scalar::Text(unquote(value).to_string())
    }

    /// Text view of the scalar; booleans and lists fall back to their source form.
    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::List(items) => Some(format!("[{}]", items.join(", "))),
            Scalar::Text(text) => Some(text),
        }
    }

    fn into_list(self) -> Vec<String> {
        match self {
            Scalar::List(items) => items,
            Scalar::Text(text) => vec![text],
            Scalar::Null | Scalar::Bool(_) => Vec::new(),
        }
    }

    fn as_bool(&self) -> bool {
        matches!(self, Scalar::Bool(true))
    }
}

/// Key/value pairs grouped into top-level entries and named sections.
#[derive(Debug, Default)]
struct Document {
    top: HashMap<String, Scalar>,
    sections: HashMap<String, HashMap<String, Scalar>>,
}

impl Document {
    fn parse(content: &str) -> Self {
        let mut doc = Document::default();
        let mut section: Option<String> = None;

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let indented = line.starts_with(char::is_whitespace);
            let Some((key, value)) = line.trim().split_once(':') else {
                continue;
            };
            let key = key.trim().to_string();

            if !indented && value.trim().is_empty() && is_section_name(&key) {
                doc.sections.entry(key.clone()).or_default();
                section = Some(key);
                continue;
            }

            match (&section, indented) {
                (Some(name), true) => {
                    doc.sections
                        .entry(name.clone())
                        .or_default()
                        .insert(key, Scalar::parse(value));
                }
                _ => {
                    doc.top.insert(key, Scalar::parse(value));
                }
            }
        }
        doc
    }

    fn take(&mut self, key: &str) -> Scalar {
        self.top.remove(key).unwrap_or(Scalar::Null)
    }

    fn section_value(&self, section: &str, key: &str) -> Scalar {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .cloned()
            .unwrap_or(Scalar::Null)
    }
}

const QUOTES: [char; 2] = ['"', '\''];

/// Strip one matching pair of surrounding quotes.
fn unquote(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && QUOTES.contains(&first) => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

/// Split the inside of `[...]` on commas outside quoted items.
///
/// A quote opens an item only at its start and closes it only when followed
/// by a comma or the end of the list.
fn split_items(inner: &str) -> Vec<String> {
    let chars: Vec<char> = inner.chars().collect();
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for (i, &c) in chars.iter().enumerate() {
        match quote {
            Some(q) if c == q && closes_item(&chars[i + 1..]) => quote = None,
            Some(_) => current.push(c),
            None if QUOTES.contains(&c) && current.trim().is_empty() => {
                current.clear();
                quote = Some(c);
            }
            None if c == ',' => {
                items.push(current.trim().to_string());
                current.clear();
            }
            None => current.push(c),
        }
    }
    items.push(current.trim().to_string());
    items
}

fn closes_item(rest: &[char]) -> bool {
    rest.iter()
        .find(|c| !c.is_whitespace())
        .map_or(true, |&c| c == ',')
}

fn is_section_name(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Location of the record inside a project directory.
pub fn record_path(project_dir: &Path) -> PathBuf {
    project_dir.join(RECORD_FILE)
}

/// Read the record stored in `project_dir`.
///
/// The stage may be written as a canonical key or a display label. A record
/// without a stage is treated as being in the entry stage.
pub fn read_record(project_dir: &Path, registry: &StageRegistry) -> Result<ProjectRecord> {
    let path = record_path(project_dir);
    if !path.is_file() {
        return Err(TrellisError::MissingMetadata {
            path: project_dir.to_path_buf(),
        });
    }
    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_record(&content, project_dir, registry)
}

fn parse_record(
    content: &str,
    project_dir: &Path,
    registry: &StageRegistry,
) -> Result<ProjectRecord> {
    let mut doc = Document::parse(content);

    let id = match doc.take("id").into_text() {
        Some(id) => id,
        None => {
            let fallback = project_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            warn!(
                "No id in {}; using directory name '{fallback}'",
                record_path(project_dir).display()
            );
            fallback
        }
    };

    let stage = match doc.take("stage").into_text() {
        Some(text) => registry.parse_role(&text)?,
        None => StageRole::Playground,
    };

    let created_at = doc.take("created_at").into_text().and_then(|raw| {
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring unparseable created_at '{raw}': {e}");
                None
            }
        }
    });

    let category = doc.take("category").into_text().and_then(|raw| {
        let category = Category::normalize(&raw);
        if category.is_none() {
            warn!("Ignoring unknown category '{raw}'");
        }
        category
    });

    Ok(ProjectRecord {
        id,
        stage,
        name: doc.take("name").into_text(),
        description: doc.take("description").into_text(),
        tags: doc.take("tags").into_list(),
        tech: doc.take("tech").into_list(),
        created_at,
        category,
        git: GitLink {
            enabled: doc.section_value("git", "enabled").as_bool(),
            repo: doc.section_value("git", "repo").into_text(),
        },
        obsidian: NoteLink {
            enabled: doc.section_value("obsidian", "enabled").as_bool(),
        },
    })
}

/// Write `record` to `project_dir`, replacing any existing file.
pub fn write_record(project_dir: &Path, record: &ProjectRecord) -> Result<()> {
    let path = record_path(project_dir);
    fs::write(&path, render_record(record))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn render_record(record: &ProjectRecord) -> String {
    let created_at = record
        .created_at
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, true));

    let mut out = String::new();
    push_line(&mut out, "", "id", Some(&record.id));
    push_line(&mut out, "", "stage", Some(record.stage.key()));
    push_line(&mut out, "", "name", record.name.as_deref());
    push_line(&mut out, "", "description", record.description.as_deref());
    out.push_str(&format!("tags: {}\n", render_list(&record.tags)));
    out.push_str(&format!("tech: {}\n", render_list(&record.tech)));
    push_line(&mut out, "", "created_at", created_at.as_deref());
    push_line(&mut out, "", "category", record.category.map(|c| c.as_str()));
    out.push_str("git:\n");
    push_line(&mut out, "  ", "enabled", Some(bool_text(record.git.enabled)));
    push_line(&mut out, "  ", "repo", record.git.repo.as_deref());
    out.push_str("obsidian:\n");
    push_line(&mut out, "  ", "enabled", Some(bool_text(record.obsidian.enabled)));
    out
}

fn push_line(out: &mut String, indent: &str, key: &str, value: Option<&str>) {
    let value = value
        .map(single_line)
        .filter(|v| !v.is_empty())
        .map(|v| render_text(&v))
        .unwrap_or_else(|| "null".to_string());
    out.push_str(&format!("{indent}{key}: {value}\n"));
}

/// Quote text that would otherwise read back as null, a boolean or a list.
fn render_text(value: &str) -> String {
    let reserved = ["null", "true", "false"]
        .iter()
        .any(|word| value.eq_ignore_ascii_case(word));
    if reserved || value.starts_with('[') || value.starts_with(QUOTES) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

fn render_list(items: &[String]) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|item| single_line(item))
        .filter(|item| !item.is_empty())
        .map(|item| render_item(&item))
        .collect();
    format!("[{}]", items.join(", "))
}

fn render_item(item: &str) -> String {
    if !item.contains(',') && !item.contains(QUOTES) {
        return item.to_string();
    }
    let quote = if item.contains('"') { '\'' } else { '"' };
    format!("{quote}{item}{quote}")
}

const fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
