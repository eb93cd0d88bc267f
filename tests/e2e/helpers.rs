//! Shared fixtures for the end-to-end tests

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use trellis::config::Settings;
use trellis::fs::write_record;
use trellis::llm::ScriptedGenerator;
use trellis::models::{Category, ProjectRecord, StageRole};
use trellis::registry::StageRegistry;

/// A temporary projects root with default stage names.
pub struct Workspace {
    pub temp: TempDir,
    pub settings: Settings,
    pub registry: StageRegistry,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let settings = Settings::for_root(temp.path());
        let registry =
            StageRegistry::from_settings(&settings).expect("Default registry is valid");
        Self {
            temp,
            settings,
            registry,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Write a project with `record` at `rel` under the root.
    pub fn add_project(&self, rel: &str, record: &ProjectRecord) -> PathBuf {
        let dir = self.root().join(rel);
        fs::create_dir_all(&dir).expect("Failed to create project dir");
        write_record(&dir, record).expect("Failed to write record");
        dir
    }

    /// A fresh playground project with one source file.
    pub fn add_playground(&self, id: &str) -> PathBuf {
        let dir = self.add_project(
            &format!("playground/{id}"),
            &ProjectRecord::new(id, StageRole::Playground),
        );
        fs::write(dir.join("main.rs"), "fn main() {\n    println!(\"widgets\");\n}\n")
            .expect("Failed to write source file");
        dir
    }

    /// An incubator project that already has a category.
    pub fn add_incubated(&self, id: &str, category: Category) -> PathBuf {
        let record = ProjectRecord {
            name: Some(id.to_string()),
            category: Some(category),
            ..ProjectRecord::new(id, StageRole::Incubator)
        };
        self.add_project(&format!("incubator/{category}/{id}"), &record)
    }

    /// Relative paths of every file under the root, sorted.
    pub fn snapshot(&self) -> Vec<String> {
        let mut files: Vec<String> = walkdir::WalkDir::new(self.root())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.depth() > 0)
            .map(|e| {
                e.path()
                    .strip_prefix(self.root())
                    .expect("walk stays under root")
                    .display()
                    .to_string()
            })
            .collect();
        files.sort();
        files
    }
}

/// Generator answering with the widget-tool draft.
pub fn widget_generator() -> ScriptedGenerator {
    ScriptedGenerator::new().with_response(json!({
        "name": "widget-tool",
        "description": "A command-line tool for building widgets.",
        "tags": ["CLI", "widgets"],
        "tech": ["Rust"],
        "category": "tools"
    }))
}
