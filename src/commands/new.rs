//! `trellis new`: create a project in a creation stage.

use anyhow::Context;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use super::print_done;
use crate::config::Settings;
use crate::error::{Result, TrellisError};
use crate::fs::{
    create_starter_file, ensure_base_structure, generate_project_id, stage_root, write_record,
};
use crate::models::{ProjectRecord, StageRole};
use crate::registry::StageRegistry;
use crate::validation::validate_project_id;

#[derive(Debug, Clone, Default)]
pub struct NewOptions {
    /// Stage label or key; defaults to the playground.
    pub stage: Option<String>,
    /// Project id to use instead of a generated one.
    pub name: Option<String>,
    /// Starter file language.
    pub lang: Option<String>,
    /// Launch VS Code in the new directory.
    pub open: bool,
}

/// Create the project directory and its initial record; returns the directory.
pub fn execute(
    settings: &Settings,
    registry: &StageRegistry,
    options: &NewOptions,
) -> Result<PathBuf> {
    let root = &settings.projects_root;

    let role = match options.stage.as_deref() {
        Some(stage) => registry.parse_role(stage)?,
        None => StageRole::Playground,
    };
    if role.is_terminal() {
        return Err(TrellisError::usage(format!(
            "Unsupported stage: {}. Choose one of: {}",
            registry.label_for(role)?,
            registry.choices(&registry.roles(false)).join(", ")
        )));
    }

    ensure_base_structure(root, registry)?;
    let stage_dir = stage_root(root, registry, role)?;

    let id = match options.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => {
            validate_project_id(name)?;
            name.to_string()
        }
        _ => generate_project_id(&stage_dir)?,
    };

    let project_dir = stage_dir.join(&id);
    if project_dir.exists() {
        return Err(TrellisError::DestinationExists { path: project_dir });
    }
    fs::create_dir(&project_dir)
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;
    write_record(&project_dir, &ProjectRecord::new(&id, role))?;
    info!("Created project {id} in {}", stage_dir.display());

    if let Some(lang) = options.lang.as_deref() {
        match create_starter_file(&project_dir, lang)? {
            Some(path) => debug!("Wrote starter file {}", path.display()),
            None => warn!("No starter template for language '{lang}'"),
        }
    }

    print_done(format!(
        "Created {} project {}",
        registry.label_for(role)?,
        id.bold()
    ));
    println!("{}", project_dir.display());

    if options.open {
        open_in_editor(&project_dir);
    }
    Ok(project_dir)
}

/// Launch `code .` in `dir` without waiting for it.
fn open_in_editor(dir: &Path) {
    let Ok(code) = which::which("code") else {
        eprintln!(
            "{} VS Code 'code' command not found on PATH; skipping open.",
            "!".yellow().bold()
        );
        return;
    };
    if let Err(e) = Command::new(code).arg(".").current_dir(dir).spawn() {
        eprintln!("{} Failed to launch VS Code: {e}", "!".yellow().bold());
    }
}
