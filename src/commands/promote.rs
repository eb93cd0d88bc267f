//! `trellis promote` and `trellis archive`.

use std::path::PathBuf;

use super::print_done;
use crate::config::Settings;
use crate::error::Result;
use crate::llm::{build_generator, MetadataGenerator, StubGenerator};
use crate::promote::{
    ProjectLocator, PromoteRequest, Promoter, PromotionOutcome, PromotionPlan, PromotionReport,
};
use crate::registry::StageRegistry;

/// Flags of `trellis promote`.
#[derive(Debug, Clone, Default)]
pub struct PromoteOptions {
    pub stage: Option<String>,
    pub archive: bool,
    pub id: Option<String>,
    pub path: Option<PathBuf>,
    pub name: Option<String>,
    pub git: bool,
    pub no_github: bool,
    pub obsidian: bool,
    pub dry_run: bool,
}

impl PromoteOptions {
    /// Translate flags into an engine request.
    ///
    /// GitHub is on unless `--no-github`; git follows GitHub unless `--git`
    /// forces it on.
    pub fn to_request(&self, registry: &StageRegistry) -> Result<PromoteRequest> {
        let target = self
            .stage
            .as_deref()
            .map(|stage| registry.parse_role(stage))
            .transpose()?;
        Ok(PromoteRequest {
            target,
            archive: self.archive,
            name_override: self.name.clone(),
            git: !self.no_github || self.git,
            github: !self.no_github,
            obsidian: self.obsidian,
            dry_run: self.dry_run,
        })
    }

    pub fn locator(&self) -> ProjectLocator {
        ProjectLocator::from_args(self.path.clone(), self.id.clone())
    }
}

/// Flags of `trellis archive`.
#[derive(Debug, Clone, Default)]
pub struct ArchiveOptions {
    pub id: Option<String>,
    pub path: Option<PathBuf>,
    pub dry_run: bool,
}

impl From<&ArchiveOptions> for PromoteOptions {
    fn from(options: &ArchiveOptions) -> Self {
        PromoteOptions {
            archive: true,
            id: options.id.clone(),
            path: options.path.clone(),
            no_github: true,
            dry_run: options.dry_run,
            ..PromoteOptions::default()
        }
    }
}

/// Promote with the configured generator.
pub fn execute(
    settings: &Settings,
    registry: &StageRegistry,
    options: &PromoteOptions,
) -> Result<PromotionOutcome> {
    let generator = build_generator(&settings.llm)?;
    execute_with(settings, registry, generator.as_ref(), options)
}

/// Promote with an explicit generator.
pub fn execute_with(
    settings: &Settings,
    registry: &StageRegistry,
    generator: &dyn MetadataGenerator,
    options: &PromoteOptions,
) -> Result<PromotionOutcome> {
    let request = options.to_request(registry)?;
    let promoter = Promoter::new(&settings.projects_root, registry, generator);
    let outcome = promoter.promote(&options.locator(), &request)?;
    match &outcome {
        PromotionOutcome::DryRun(plan) => print_plan(plan, registry)?,
        PromotionOutcome::Completed(report) => print_report(report, registry)?,
    }
    Ok(outcome)
}

/// Archive a project. Never generates metadata and never touches git.
pub fn archive(
    settings: &Settings,
    registry: &StageRegistry,
    options: &ArchiveOptions,
) -> Result<PromotionOutcome> {
    execute_with(settings, registry, &StubGenerator, &options.into())
}

fn print_plan(plan: &PromotionPlan, registry: &StageRegistry) -> Result<()> {
    let category = plan
        .record
        .category
        .map(|c| c.to_string())
        .unwrap_or_default();
    println!("Old path: {}", plan.source.display());
    println!("New path: {}", plan.destination.display());
    println!(
        "Metadata changes: stage={}, id={}, name={}, category={category}",
        registry.label_for(plan.to)?,
        plan.record.id,
        plan.record.display_name(),
    );
    println!("Git: {}", if plan.git { "init" } else { "skip" });
    println!(
        "GitHub: {}",
        if plan.github {
            format!("create {}", plan.repo_slug())
        } else {
            "skip".to_string()
        }
    );
    if plan.readme_missing {
        println!("README: create");
    }
    if plan.git {
        println!("Git commit: create initial commit");
    }
    if plan.github {
        println!("Git push: push to origin");
    }
    println!("Obsidian: {}", if plan.obsidian { "enabled" } else { "skip" });
    Ok(())
}

fn print_report(report: &PromotionReport, registry: &StageRegistry) -> Result<()> {
    print_done(format!(
        "Project promoted to: {}",
        registry.label_for(report.record.stage)?
    ));
    if let Some(category) = report.record.category {
        print_done(format!("Category: {category}"));
    }
    print_done(format!("New path: {}", report.destination.display()));
    if report.git_initialized {
        print_done("Git initialized");
    }
    if report.repo_created {
        match report.repo_url.as_deref() {
            Some(url) => print_done(format!("GitHub repo created: {url}")),
            None => print_done("GitHub repo created"),
        }
    }
    if report.readme_created {
        print_done("README.md created");
    }
    if report.committed {
        print_done("Initial commit created");
    }
    if report.pushed {
        print_done("Pushed to GitHub");
    }
    if report.note_created {
        print_done("Obsidian note created");
    }
    Ok(())
}
