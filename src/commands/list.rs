//! `trellis list`: projects grouped by stage.

use colored::Colorize;
use std::path::PathBuf;
use tracing::warn;

use crate::config::Settings;
use crate::error::Result;
use crate::fs::{list_projects, read_record};
use crate::models::{ProjectRecord, StageRole};
use crate::registry::StageRegistry;

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only this stage (label or key).
    pub stage: Option<String>,
    /// Only projects carrying this tag.
    pub tag: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListedProject {
    pub role: StageRole,
    pub path: PathBuf,
    pub record: ProjectRecord,
}

/// Print matching projects and return them in display order.
pub fn execute(
    settings: &Settings,
    registry: &StageRegistry,
    options: &ListOptions,
) -> Result<Vec<ListedProject>> {
    let roles = match options.stage.as_deref() {
        Some(stage) => vec![registry.parse_role(stage)?],
        None => registry.all_roles(),
    };
    let tag = options
        .tag
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let mut listed = Vec::new();
    for role in roles {
        let mut in_stage = Vec::new();
        for path in list_projects(&settings.projects_root, registry, role)? {
            let record = match read_record(&path, registry) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    continue;
                }
            };
            if let Some(tag) = &tag {
                if !record.tags.iter().any(|t| t == tag) {
                    continue;
                }
            }
            in_stage.push(ListedProject { role, path, record });
        }

        if in_stage.is_empty() {
            continue;
        }
        println!("{}", registry.label_for(role)?.bold());
        for project in &in_stage {
            let category = project
                .record
                .category
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<28} {:<10} {}",
                project.record.id,
                category.dimmed(),
                project.record.display_name()
            );
        }
        listed.extend(in_stage);
    }

    if listed.is_empty() {
        println!("{}", "No projects found.".dimmed());
    }
    Ok(listed)
}
