//! Archiving from every non-terminal stage

use super::helpers::Workspace;
use trellis::commands::promote::{archive, ArchiveOptions};
use trellis::error::TrellisError;
use trellis::fs::read_record;
use trellis::models::{Category, ProjectRecord, StageRole};
use trellis::promote::PromotionOutcome;

fn by_id(id: &str) -> ArchiveOptions {
    ArchiveOptions {
        id: Some(id.to_string()),
        ..ArchiveOptions::default()
    }
}

#[test]
fn test_archive_incubated_project() {
    let ws = Workspace::new();
    let source = ws.add_incubated("widget-tool", Category::Tools);

    let outcome = archive(&ws.settings, &ws.registry, &by_id("widget-tool")).unwrap();
    let PromotionOutcome::Completed(report) = outcome else {
        panic!("expected a live archive");
    };

    let dest = ws.root().join("archives/Tools/widget-tool");
    assert_eq!(report.destination, dest);
    assert!(!source.exists());
    assert!(!report.git_initialized && !report.repo_created && !report.pushed);

    let record = read_record(&dest, &ws.registry).unwrap();
    assert_eq!(record.stage, StageRole::Archive);
    assert_eq!(record.category, Some(Category::Tools));
}

#[test]
fn test_archive_dry_run() {
    let ws = Workspace::new();
    ws.add_incubated("widget-tool", Category::Web);
    let before = ws.snapshot();

    let options = ArchiveOptions {
        dry_run: true,
        ..by_id("widget-tool")
    };
    let outcome = archive(&ws.settings, &ws.registry, &options).unwrap();
    assert!(matches!(outcome, PromotionOutcome::DryRun(_)));
    assert_eq!(ws.snapshot(), before);
}

#[test]
fn test_archive_playground_without_category_fails() {
    let ws = Workspace::new();
    ws.add_playground("QuickFox1234");

    let err = archive(&ws.settings, &ws.registry, &by_id("QuickFox1234")).unwrap_err();
    assert!(matches!(err, TrellisError::MissingCategory));
    assert!(ws.root().join("playground/QuickFox1234").exists());
}

#[test]
fn test_archived_project_cannot_move() {
    let ws = Workspace::new();
    ws.add_project(
        "archives/Games/old-game",
        &ProjectRecord {
            category: Some(Category::Games),
            ..ProjectRecord::new("old-game", StageRole::Archive)
        },
    );

    let err = archive(&ws.settings, &ws.registry, &by_id("old-game")).unwrap_err();
    assert!(matches!(err, TrellisError::TerminalStage { .. }));
}
