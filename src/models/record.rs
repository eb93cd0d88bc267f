use chrono::{DateTime, Utc};

use super::category::Category;
use super::stage::StageRole;

/// Name of the metadata file inside every project directory.
pub const RECORD_FILE: &str = "project.yaml";

/// Version-control linkage, the `git:` section of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitLink {
    pub enabled: bool,
    pub repo: Option<String>,
}

/// Note linkage, the `obsidian:` section of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteLink {
    pub enabled: bool,
}

/// Persisted metadata for one project.
///
/// `id` and `created_at` are assigned at creation. Promotion out of the entry
/// stage is the only operation that replaces `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub id: String,
    pub stage: StageRole,
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub tech: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub category: Option<Category>,
    pub git: GitLink,
    pub obsidian: NoteLink,
}

impl ProjectRecord {
    /// Fresh record for a newly created project.
    pub fn new(id: impl Into<String>, stage: StageRole) -> Self {
        Self {
            id: id.into(),
            stage,
            name: None,
            description: None,
            tags: Vec::new(),
            tech: Vec::new(),
            created_at: Some(Utc::now()),
            category: None,
            git: GitLink::default(),
            obsidian: NoteLink::default(),
        }
    }

    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
