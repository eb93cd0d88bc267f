//! Project lookup and context collection against a real directory tree

use serial_test::serial;
use std::fs;

use super::helpers::{widget_generator, Workspace};
use trellis::commands::promote::{execute_with, PromoteOptions};
use trellis::context::{collect, MAX_FILES};
use trellis::error::TrellisError;
use trellis::models::{Category, ProjectRecord, StageRole};
use trellis::promote::ProjectLocator;

#[test]
fn test_ambiguous_id_aborts() {
    let ws = Workspace::new();
    ws.add_incubated("widget", Category::Tools);
    ws.add_project(
        "archives/Games/widget",
        &ProjectRecord {
            category: Some(Category::Games),
            ..ProjectRecord::new("widget", StageRole::Archive)
        },
    );
    let before = ws.snapshot();

    let options = PromoteOptions {
        stage: Some("product".into()),
        id: Some("widget".into()),
        no_github: true,
        ..PromoteOptions::default()
    };
    let err = execute_with(&ws.settings, &ws.registry, &widget_generator(), &options).unwrap_err();

    match err {
        TrellisError::AmbiguousProject { matches, .. } => assert_eq!(matches.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ws.snapshot(), before);
}

#[test]
fn test_unknown_id_is_not_found() {
    let ws = Workspace::new();
    let err = ProjectLocator::Id("ghost".into())
        .resolve(ws.root(), &ws.registry)
        .unwrap_err();
    assert!(matches!(err, TrellisError::NotFound { .. }));
}

#[test]
fn test_missing_record_is_reported() {
    let ws = Workspace::new();
    let bare = ws.root().join("playground/bare");
    fs::create_dir_all(&bare).unwrap();

    let options = PromoteOptions {
        stage: Some("incubator".into()),
        path: Some(bare),
        no_github: true,
        ..PromoteOptions::default()
    };
    let err = execute_with(&ws.settings, &ws.registry, &widget_generator(), &options).unwrap_err();
    assert!(matches!(err, TrellisError::MissingMetadata { .. }));
}

#[test]
#[serial]
fn test_current_directory_is_default_target() {
    let ws = Workspace::new();
    let source = ws.add_playground("QuickFox1234");
    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(&source).unwrap();

    let resolved = ProjectLocator::CurrentDir.resolve(ws.root(), &ws.registry);

    std::env::set_current_dir(original).unwrap();
    assert_eq!(resolved.unwrap(), fs::canonicalize(&source).unwrap());
}

#[test]
fn test_file_cap_on_large_project() {
    let ws = Workspace::new();
    let dir = ws.add_playground("BigProject");
    fs::create_dir_all(dir.join("data")).unwrap();
    for i in 0..301 {
        fs::write(dir.join("data").join(format!("row{i:04}.csv")), "1,2,3").unwrap();
    }

    let summary = collect(&dir, &ws.registry);
    assert_eq!(summary.files.len(), MAX_FILES);
    assert!(!summary.files.iter().any(|f| f == "project.yaml"));
    assert_eq!(summary.stage, "playground");
}
