//! `describe` followed by a later-stage promotion

use serde_json::json;

use super::helpers::Workspace;
use trellis::commands::describe::{self, DescribeOptions};
use trellis::commands::promote::{execute_with, PromoteOptions};
use trellis::fs::read_record;
use trellis::llm::ScriptedGenerator;
use trellis::models::{Category, ProjectRecord, StageRole};

#[test]
fn test_describe_enables_promotion_of_uncategorized_project() {
    let ws = Workspace::new();
    let dir = ws.add_project(
        "incubator/notes-app",
        &ProjectRecord {
            name: Some("Notes App".into()),
            ..ProjectRecord::new("notes-app", StageRole::Incubator)
        },
    );

    let generator = ScriptedGenerator::new().with_raw_response(
        "```json\n{\"project_name\": \"Notebook\", \"description\": \"Takes notes.\", \
         \"tags\": [\"notes\"], \"tech_stack\": [\"TypeScript\"], \"category\": \"web\"}\n```",
    );
    let options = DescribeOptions {
        id: Some("notes-app".into()),
        ..DescribeOptions::default()
    };
    describe::execute_with(&ws.settings, &ws.registry, &generator, &options).unwrap();

    let record = read_record(&dir, &ws.registry).unwrap();
    assert_eq!(record.name.as_deref(), Some("Notes App"));
    assert_eq!(record.tech, vec!["TypeScript"]);
    assert_eq!(record.category, Some(Category::Web));

    let promote = PromoteOptions {
        stage: Some("product".into()),
        id: Some("notes-app".into()),
        no_github: true,
        ..PromoteOptions::default()
    };
    execute_with(&ws.settings, &ws.registry, &generator, &promote).unwrap();

    let dest = ws.root().join("products/Web/notes-app");
    let moved = read_record(&dest, &ws.registry).unwrap();
    assert_eq!(moved.stage, StageRole::Product);
    assert_eq!(moved.id, "notes-app");
    assert_eq!(generator.call_count(), 1);
}

#[test]
fn test_describe_rejects_incomplete_draft() {
    let ws = Workspace::new();
    let dir = ws.add_playground("QuickFox1234");
    let before = std::fs::read_to_string(dir.join("project.yaml")).unwrap();

    let generator = ScriptedGenerator::new().with_response(json!({
        "name": "widget-tool",
        "description": "Widgets.",
        "tags": [],
        "tech": []
    }));
    let options = DescribeOptions {
        path: Some(dir.clone()),
        force: true,
        ..DescribeOptions::default()
    };
    let err = describe::execute_with(&ws.settings, &ws.registry, &generator, &options);
    assert!(matches!(
        err,
        Err(trellis::error::TrellisError::InvalidMetadata)
    ));
    assert_eq!(
        std::fs::read_to_string(dir.join("project.yaml")).unwrap(),
        before
    );
}
