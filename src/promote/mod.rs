//! Promotion engine.
//!
//! A promotion is planned first and executed second. Planning reads the
//! record, checks the transition, calls the generator when leaving the entry
//! stage and computes the destination; it never touches the filesystem. A dry
//! run stops after planning.
//!
//! Execution moves the directory with a single rename and then runs the side
//! effects in order. Nothing is rolled back: once the directory has moved, a
//! failure is reported as [`TrellisError::Incomplete`] with the steps that
//! already happened.

pub mod artifacts;
pub mod merge;

pub use merge::merge_metadata;

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::context;
use crate::error::{Result, TrellisError};
use crate::fs::{read_record, resolve_project_path, write_record};
use crate::git;
use crate::llm::MetadataGenerator;
use crate::models::{ProjectRecord, StageRole};
use crate::registry::StageRegistry;
use crate::utils::slugify;
use crate::validation::{validate_payload, validate_project_id, ValidatedMetadata};

/// Commit message for the first commit of a promoted project.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// How the project to promote is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectLocator {
    Path(PathBuf),
    Id(String),
    CurrentDir,
}

impl ProjectLocator {
    /// Build a locator from optional `--path` / `--id` arguments.
    pub fn from_args(path: Option<PathBuf>, id: Option<String>) -> Self {
        match (path, id) {
            (Some(path), _) => ProjectLocator::Path(path),
            (None, Some(id)) => ProjectLocator::Id(id),
            (None, None) => ProjectLocator::CurrentDir,
        }
    }

    pub fn resolve(&self, root: &Path, registry: &StageRegistry) -> Result<PathBuf> {
        match self {
            ProjectLocator::Path(path) => resolve_project_path(Some(path), None, root, registry),
            ProjectLocator::Id(id) => resolve_project_path(None, Some(id), root, registry),
            ProjectLocator::CurrentDir => resolve_project_path(None, None, root, registry),
        }
    }
}

/// Options for one promotion.
#[derive(Debug, Clone, Default)]
pub struct PromoteRequest {
    pub target: Option<StageRole>,
    pub archive: bool,
    pub name_override: Option<String>,
    pub git: bool,
    pub github: bool,
    pub obsidian: bool,
    pub dry_run: bool,
}

/// Everything decided before the first mutation.
#[derive(Debug, Clone)]
pub struct PromotionPlan {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub from: StageRole,
    pub to: StageRole,
    /// Record as it will be written after the move.
    pub record: ProjectRecord,
    /// Whether the generator supplied the metadata.
    pub generated: bool,
    pub git: bool,
    pub github: bool,
    pub obsidian: bool,
    pub readme_missing: bool,
}

impl PromotionPlan {
    /// Repository name used for `gh repo create`.
    pub fn repo_slug(&self) -> String {
        slugify(self.record.display_name())
    }
}

/// What a live promotion did.
#[derive(Debug, Clone)]
pub struct PromotionReport {
    pub destination: PathBuf,
    pub record: ProjectRecord,
    pub git_initialized: bool,
    pub repo_created: bool,
    pub repo_url: Option<String>,
    pub readme_created: bool,
    pub note_created: bool,
    pub committed: bool,
    pub pushed: bool,
}

#[derive(Debug, Clone)]
pub enum PromotionOutcome {
    DryRun(PromotionPlan),
    Completed(PromotionReport),
}

/// Collect context, call the generator and validate its draft.
pub fn generate_metadata(
    project_dir: &Path,
    registry: &StageRegistry,
    generator: &dyn MetadataGenerator,
) -> Result<ValidatedMetadata> {
    let summary = context::collect(project_dir, registry);
    debug!(
        "Collected {} files, {} snippets for {}",
        summary.files.len(),
        summary.snippets.len(),
        generator.name()
    );
    let draft = generator.generate(&summary)?;
    validate_payload(&draft).ok_or(TrellisError::InvalidMetadata)
}

pub struct Promoter<'a> {
    root: &'a Path,
    registry: &'a StageRegistry,
    generator: &'a dyn MetadataGenerator,
}

impl<'a> Promoter<'a> {
    pub fn new(
        root: &'a Path,
        registry: &'a StageRegistry,
        generator: &'a dyn MetadataGenerator,
    ) -> Self {
        Self {
            root,
            registry,
            generator,
        }
    }

    /// Plan and, unless `dry_run`, execute a promotion.
    pub fn promote(
        &self,
        locator: &ProjectLocator,
        request: &PromoteRequest,
    ) -> Result<PromotionOutcome> {
        let source = locator.resolve(self.root, self.registry)?;
        let plan = self.plan(&source, request)?;
        if request.dry_run {
            return Ok(PromotionOutcome::DryRun(plan));
        }
        self.execute(plan).map(PromotionOutcome::Completed)
    }

    /// Decide the destination and the updated record without mutating anything.
    pub fn plan(&self, source: &Path, request: &PromoteRequest) -> Result<PromotionPlan> {
        let existing = read_record(source, self.registry)?;
        let from = existing.stage;

        let to = if request.archive {
            from.try_archive()?
        } else {
            let target = request.target.ok_or_else(|| {
                TrellisError::usage("Missing required --stage (or use --archive).")
            })?;
            from.try_promote(target)?
        };

        let name_override = request
            .name_override
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let generated = from == StageRole::Playground && to == StageRole::Incubator;
        let mut record = if generated {
            let metadata = generate_metadata(source, self.registry, self.generator)?;
            let mut merged = merge_metadata(&existing, &metadata, true);
            merged.id = slugify(name_override.unwrap_or(&metadata.name));
            merged
        } else {
            if existing.category.is_none() {
                return Err(TrellisError::MissingCategory);
            }
            existing.clone()
        };
        if let Some(name) = name_override {
            record.name = Some(name.to_string());
        }
        record.stage = to;
        record.git.enabled = existing.git.enabled || request.git;
        record.obsidian.enabled = existing.obsidian.enabled || request.obsidian;

        // Stored ids are hand-editable and end up in a path.
        validate_project_id(&record.id)?;
        let category = record.category.ok_or(TrellisError::MissingCategory)?;
        let destination = self
            .root
            .join(self.registry.directory_for(to)?)
            .join(category.as_str())
            .join(&record.id);
        if destination.exists() {
            return Err(TrellisError::DestinationExists { path: destination });
        }

        Ok(PromotionPlan {
            readme_missing: !source.join(artifacts::README_FILE).exists(),
            source: source.to_path_buf(),
            destination,
            from,
            to,
            record,
            generated,
            git: request.git,
            github: request.github,
            obsidian: request.obsidian,
        })
    }

    /// Move the project and run the side effects.
    pub fn execute(&self, plan: PromotionPlan) -> Result<PromotionReport> {
        if plan.git {
            git::require_tool("git")?;
        }
        if plan.github {
            git::require_tool("gh")?;
        }

        // Re-check right before the move; the plan may be stale.
        if plan.destination.exists() {
            return Err(TrellisError::DestinationExists {
                path: plan.destination,
            });
        }
        let created_parent = match plan.destination.parent() {
            Some(parent) => create_parent(parent)?,
            None => None,
        };
        if let Err(e) = fs::rename(&plan.source, &plan.destination) {
            if let (Some(parent), Some(top)) = (plan.destination.parent(), created_parent) {
                remove_empty_dirs(parent, &top);
            }
            return Err(anyhow::Error::new(e)
                .context(format!(
                    "Failed to move {} to {}",
                    plan.source.display(),
                    plan.destination.display()
                ))
                .into());
        }
        info!(
            "Moved {} to {}",
            plan.source.display(),
            plan.destination.display()
        );

        let mut completed = vec![format!("Project moved to {}", plan.destination.display())];
        let destination = plan.destination.clone();
        let mut report = PromotionReport {
            destination: plan.destination.clone(),
            record: plan.record.clone(),
            git_initialized: false,
            repo_created: false,
            repo_url: None,
            readme_created: false,
            note_created: false,
            committed: false,
            pushed: false,
        };

        match run_side_effects(&plan, &mut report, &mut completed) {
            Ok(()) => Ok(report),
            Err(cause) => Err(TrellisError::Incomplete {
                destination,
                completed,
                cause: Box::new(cause),
            }),
        }
    }
}

/// Create `parent` and return the topmost directory this call created.
fn create_parent(parent: &Path) -> Result<Option<PathBuf>> {
    let top = parent
        .ancestors()
        .take_while(|dir| !dir.exists())
        .last()
        .map(Path::to_path_buf);
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;
    Ok(top)
}

/// Remove `dir` and its empty ancestors up to and including `top`.
fn remove_empty_dirs(dir: &Path, top: &Path) {
    for current in dir.ancestors() {
        if let Err(e) = fs::remove_dir(current) {
            debug!("Leaving {}: {e}", current.display());
            break;
        }
        if current == top {
            break;
        }
    }
}

fn run_side_effects(
    plan: &PromotionPlan,
    report: &mut PromotionReport,
    completed: &mut Vec<String>,
) -> Result<()> {
    let dir = plan.destination.as_path();

    if plan.git && git::init_repo(dir)? {
        report.git_initialized = true;
        completed.push("Git initialized".to_string());
    }

    if plan.github {
        git::create_remote_repo(dir, &plan.repo_slug())?;
        report.repo_created = true;
        let url = git::remote_repo_url(dir);
        if !url.is_empty() {
            report.record.git.repo = Some(url.clone());
            report.repo_url = Some(url);
        }
        completed.push("GitHub repo created".to_string());
    }

    write_record(dir, &report.record)?;
    completed.push("Metadata updated".to_string());

    if artifacts::write_readme(dir, &report.record)? {
        report.readme_created = true;
        completed.push("README.md created".to_string());
    }

    if plan.obsidian {
        artifacts::write_note(dir, &report.record.id)?;
        report.note_created = true;
        completed.push("Obsidian note created".to_string());
    }

    if plan.git && git::has_changes(dir)? {
        git::commit_all(dir, INITIAL_COMMIT_MESSAGE)?;
        report.committed = true;
        completed.push("Initial commit created".to_string());
    }

    if plan.github && git::has_head(dir) {
        git::push_head(dir)?;
        report.pushed = true;
        completed.push("Pushed to GitHub".to_string());
    }

    Ok(())
}
