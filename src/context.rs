//! Shallow project summary for metadata generation.
//!
//! The summary is built fresh for every request: a bounded file list, the
//! languages implied by file extensions, a few short snippets and the
//! optional `NOTES.md` free text.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::fs::read_record;
use crate::models::RECORD_FILE;
use crate::registry::StageRegistry;
use crate::utils::truncate_chars;

/// Maximum number of file names collected.
pub const MAX_FILES: usize = 300;

/// Maximum number of snippets collected.
pub const MAX_SNIPPETS: usize = 8;

/// Character budget per snippet.
pub const SNIPPET_CHARS: usize = 2000;

/// Character budget for the notes file.
pub const NOTES_CHARS: usize = 1000;

/// Optional free-text notes file inside a project.
pub const NOTES_FILE: &str = "NOTES.md";

/// Placeholder used when a value cannot be determined.
pub const UNKNOWN: &str = "unknown";

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &[
    ".git",
    ".venv",
    "__pycache__",
    "node_modules",
    ".mypy_cache",
    "target",
];

const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("rs", "rust"),
    ("go", "go"),
    ("java", "java"),
    ("rb", "ruby"),
    ("php", "php"),
    ("cs", "csharp"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("h", "c"),
    ("html", "html"),
    ("css", "css"),
    ("json", "json"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub path: String,
    pub snippet: String,
}

/// Input to the metadata generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
    pub files: Vec<String>,
    pub languages: Vec<String>,
    pub notes: Option<String>,
    pub stage: String,
    pub snippets: Vec<Snippet>,
}

/// Language tag for a file extension, if the extension is recognized.
pub fn language_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    EXTENSION_LANGUAGES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, language)| *language)
}

/// Scan `project_dir` into a [`ContextSummary`].
///
/// Never fails: unreadable entries are skipped and the file list is simply
/// cut off at [`MAX_FILES`].
pub fn collect(project_dir: &Path, registry: &StageRegistry) -> ContextSummary {
    let mut files = Vec::new();
    let mut languages = BTreeSet::new();
    let mut snippets = Vec::new();

    let walker = WalkDir::new(project_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() > 0 && e.file_type().is_dir() {
                let name = e.file_name().to_string_lossy();
                return !SKIP_DIRS.contains(&name.as_ref());
            }
            true
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file());

    for entry in walker {
        if files.len() >= MAX_FILES {
            debug!("File cap of {MAX_FILES} reached in {}", project_dir.display());
            break;
        }
        if entry.file_name() == RECORD_FILE {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(project_dir) else {
            continue;
        };
        let relative = relative.display().to_string();

        if let Some(language) = language_for(entry.path()) {
            languages.insert(language.to_string());
            if snippets.len() < MAX_SNIPPETS {
                if let Some(snippet) = read_trimmed(entry.path(), SNIPPET_CHARS) {
                    snippets.push(Snippet {
                        path: relative.clone(),
                        snippet,
                    });
                }
            }
        }
        files.push(relative);
    }

    let languages = if languages.is_empty() {
        vec![UNKNOWN.to_string()]
    } else {
        languages.into_iter().collect()
    };

    ContextSummary {
        files,
        languages,
        notes: read_trimmed(&project_dir.join(NOTES_FILE), NOTES_CHARS),
        stage: current_stage_label(project_dir, registry),
        snippets,
    }
}

/// Trimmed file content cut to `max_chars`; `None` when unreadable or blank.
fn read_trimmed(path: &Path, max_chars: usize) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    let content = String::from_utf8_lossy(&bytes);
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate_chars(trimmed, max_chars))
}

fn current_stage_label(project_dir: &Path, registry: &StageRegistry) -> String {
    read_record(project_dir, registry)
        .ok()
        .and_then(|record| registry.label_for(record.stage).ok().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN.to_string())
}
