//! Full project lifecycle: new, promote out of the playground, promote again

use std::fs;

use super::helpers::{widget_generator, Workspace};
use trellis::commands::new::{self, NewOptions};
use trellis::commands::promote::{execute_with, PromoteOptions};
use trellis::error::TrellisError;
use trellis::fs::read_record;
use trellis::llm::ScriptedGenerator;
use trellis::models::{Category, StageRole};
use trellis::promote::PromotionOutcome;

fn offline(id: &str, stage: &str) -> PromoteOptions {
    PromoteOptions {
        stage: Some(stage.to_string()),
        id: Some(id.to_string()),
        no_github: true,
        ..PromoteOptions::default()
    }
}

#[test]
fn test_widget_tool_promotion() {
    let ws = Workspace::new();
    let source = ws.add_playground("QuickFox1234");
    let created = read_record(&source, &ws.registry).unwrap().created_at;
    let generator = widget_generator();

    let outcome = execute_with(
        &ws.settings,
        &ws.registry,
        &generator,
        &offline("QuickFox1234", "incubator"),
    )
    .unwrap();

    let dest = ws.root().join("incubator").join("Tools").join("widget-tool");
    match outcome {
        PromotionOutcome::Completed(report) => assert_eq!(report.destination, dest),
        PromotionOutcome::DryRun(_) => panic!("expected a live promotion"),
    }
    assert!(!source.exists());
    assert!(dest.join("main.rs").exists());
    assert!(dest.join("README.md").exists());
    assert!(!dest.join(".git").exists());

    let record = read_record(&dest, &ws.registry).unwrap();
    assert_eq!(record.id, "widget-tool");
    assert_eq!(record.stage, StageRole::Incubator);
    assert_eq!(record.category, Some(Category::Tools));
    assert_eq!(record.tags, vec!["cli", "widgets"]);
    assert_eq!(record.created_at, created);
    assert!(!record.git.enabled);
    assert_eq!(generator.call_count(), 1);

    let context = generator.last_context().unwrap();
    assert_eq!(context.stage, "playground");
    assert_eq!(context.languages, vec!["rust"]);
}

#[test]
fn test_dry_run_touches_nothing() {
    let ws = Workspace::new();
    ws.add_playground("QuickFox1234");
    let before = ws.snapshot();

    let options = PromoteOptions {
        dry_run: true,
        ..offline("QuickFox1234", "incubator")
    };
    let outcome = execute_with(&ws.settings, &ws.registry, &widget_generator(), &options).unwrap();

    let PromotionOutcome::DryRun(plan) = outcome else {
        panic!("expected a dry run");
    };
    assert_eq!(
        plan.destination,
        ws.root().join("incubator/Tools/widget-tool")
    );
    assert_eq!(ws.snapshot(), before);
    assert!(!ws.root().join("incubator").exists());
}

#[test]
fn test_dry_run_with_every_side_effect_enabled() {
    let ws = Workspace::new();
    ws.add_incubated("widget-tool", Category::Tools);
    let before = ws.snapshot();

    let options = PromoteOptions {
        stage: Some("tool".into()),
        id: Some("widget-tool".into()),
        git: true,
        no_github: false,
        obsidian: true,
        dry_run: true,
        ..PromoteOptions::default()
    };
    let outcome = execute_with(&ws.settings, &ws.registry, &widget_generator(), &options).unwrap();

    let PromotionOutcome::DryRun(plan) = outcome else {
        panic!("expected a dry run");
    };
    assert!(plan.git && plan.github && plan.obsidian);
    assert_eq!(plan.destination, ws.root().join("tools/Tools/widget-tool"));
    assert_eq!(ws.snapshot(), before);
    assert!(!ws.root().join("tools").exists());
}

#[test]
fn test_destination_exists_leaves_source() {
    let ws = Workspace::new();
    let source = ws.add_playground("QuickFox1234");
    let occupied = ws.root().join("incubator/Tools/widget-tool");
    fs::create_dir_all(&occupied).unwrap();
    let before = fs::read_to_string(source.join("project.yaml")).unwrap();

    let err = execute_with(
        &ws.settings,
        &ws.registry,
        &widget_generator(),
        &offline("QuickFox1234", "incubator"),
    )
    .unwrap_err();

    assert!(matches!(err, TrellisError::DestinationExists { .. }));
    assert_eq!(fs::read_to_string(source.join("project.yaml")).unwrap(), before);
    assert_eq!(fs::read_dir(&occupied).unwrap().count(), 0);
}

#[test]
fn test_generator_failure_aborts_without_mutation() {
    let ws = Workspace::new();
    ws.add_playground("QuickFox1234");
    let before = ws.snapshot();

    let generator = ScriptedGenerator::new().with_error("connection refused");
    let err = execute_with(
        &ws.settings,
        &ws.registry,
        &generator,
        &offline("QuickFox1234", "incubator"),
    )
    .unwrap_err();

    assert!(matches!(err, TrellisError::Generator { .. }));
    assert_eq!(ws.snapshot(), before);
}

#[test]
fn test_new_then_promote_twice() {
    let ws = Workspace::new();
    let created = new::execute(&ws.settings, &ws.registry, &NewOptions::default()).unwrap();
    let id = created.file_name().unwrap().to_string_lossy().to_string();

    execute_with(
        &ws.settings,
        &ws.registry,
        &widget_generator(),
        &offline(&id, "incubator"),
    )
    .unwrap();

    let generator = widget_generator();
    execute_with(
        &ws.settings,
        &ws.registry,
        &generator,
        &offline("widget-tool", "tool"),
    )
    .unwrap();
    assert_eq!(generator.call_count(), 0);

    let dest = ws.root().join("tools/Tools/widget-tool");
    let record = read_record(&dest, &ws.registry).unwrap();
    assert_eq!(record.stage, StageRole::Tool);
    assert_eq!(record.id, "widget-tool");
    assert!(!ws.root().join("incubator/Tools/widget-tool").exists());
}

#[test]
fn test_skipping_a_stage_is_rejected() {
    let ws = Workspace::new();
    ws.add_playground("QuickFox1234");
    let before = ws.snapshot();
    let generator = widget_generator();

    let err = execute_with(
        &ws.settings,
        &ws.registry,
        &generator,
        &offline("QuickFox1234", "product"),
    )
    .unwrap_err();

    assert!(matches!(err, TrellisError::InvalidTransition { .. }));
    assert_eq!(generator.call_count(), 0);
    assert_eq!(ws.snapshot(), before);
}

#[test]
fn test_uncategorized_incubator_project_needs_describe() {
    let ws = Workspace::new();
    ws.add_project(
        "incubator/loose",
        &trellis::models::ProjectRecord::new("loose", StageRole::Incubator),
    );

    let err = execute_with(
        &ws.settings,
        &ws.registry,
        &widget_generator(),
        &offline("loose", "product"),
    )
    .unwrap_err();
    assert!(matches!(err, TrellisError::MissingCategory));
    assert!(err.to_string().contains("describe"));
}
