//! `trellis describe`: generate metadata for a project in place.

use std::path::PathBuf;

use super::{format_list, print_done};
use crate::config::Settings;
use crate::error::Result;
use crate::fs::{read_record, write_record};
use crate::llm::{build_generator, MetadataGenerator};
use crate::models::ProjectRecord;
use crate::promote::{generate_metadata, merge_metadata, ProjectLocator};
use crate::registry::StageRegistry;

#[derive(Debug, Clone, Default)]
pub struct DescribeOptions {
    pub path: Option<PathBuf>,
    pub id: Option<String>,
    /// Overwrite fields that already have values.
    pub force: bool,
    pub dry_run: bool,
}

pub fn execute(
    settings: &Settings,
    registry: &StageRegistry,
    options: &DescribeOptions,
) -> Result<ProjectRecord> {
    let generator = build_generator(&settings.llm)?;
    execute_with(settings, registry, generator.as_ref(), options)
}

/// Generate, merge and (unless dry-run) write; returns the merged record.
///
/// The project stays where it is: id, stage and linkage never change here.
pub fn execute_with(
    settings: &Settings,
    registry: &StageRegistry,
    generator: &dyn MetadataGenerator,
    options: &DescribeOptions,
) -> Result<ProjectRecord> {
    let locator = ProjectLocator::from_args(options.path.clone(), options.id.clone());
    let project_dir = locator.resolve(&settings.projects_root, registry)?;
    let existing = read_record(&project_dir, registry)?;

    let metadata = generate_metadata(&project_dir, registry, generator)?;
    let merged = merge_metadata(&existing, &metadata, options.force);

    print_done("AI metadata generated.");
    print_done(format!("name: {}", merged.display_name()));
    print_done(format!("tags: {}", format_list(&merged.tags)));
    print_done(format!(
        "category: {}",
        merged.category.map(|c| c.to_string()).unwrap_or_default()
    ));

    if options.dry_run {
        print_done("project.yaml unchanged (dry-run).");
    } else {
        write_record(&project_dir, &merged)?;
        print_done("project.yaml updated.");
    }
    Ok(merged)
}
