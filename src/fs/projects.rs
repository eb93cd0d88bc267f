//! Project directory layout and lookup.
//!
//! Projects live under `{root}/{stage_dir}/{id}` in the creation stages and
//! under `{root}/{stage_dir}/{category}/{id}` once promoted. Lookup by id
//! searches both shapes in every registered stage directory.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use super::record_file::record_path;
use crate::config::expand_tilde;
use crate::error::{Result, TrellisError};
use crate::models::StageRole;
use crate::registry::StageRegistry;

/// Attempts before giving up on a unique generated id.
const ID_ATTEMPTS: usize = 1000;

const ADJECTIVES: &[&str] = &[
    "Agile", "Bright", "Calm", "Daring", "Eager", "Fuzzy", "Gentle", "Happy", "Jolly", "Lively",
    "Mighty", "Nimble", "Quick", "Radiant", "Sunny", "Swift", "Witty",
];

const NOUNS: &[&str] = &[
    "Fox", "Llama", "Otter", "Panda", "Rocket", "River", "Comet", "Harbor", "Maple", "Nimbus",
    "Quartz", "Signal", "Sprout", "Summit", "Vector",
];

/// Starter file written by `new --lang`: (language aliases, filename, content).
const STARTERS: &[(&[&str], &str, &str)] = &[
    (&["python", "py"], "main.py", "print(\"Hello from trellis\")\n"),
    (
        &["js", "javascript"],
        "main.js",
        "console.log(\"Hello from trellis\");\n",
    ),
    (
        &["rust", "rs"],
        "main.rs",
        "fn main() {\n    println!(\"Hello from trellis\");\n}\n",
    ),
];

/// Absolute path of a stage directory.
pub fn stage_root(root: &Path, registry: &StageRegistry, role: StageRole) -> Result<PathBuf> {
    Ok(root.join(registry.directory_for(role)?))
}

/// Create the projects root and every stage directory if missing.
pub fn ensure_base_structure(root: &Path, registry: &StageRegistry) -> Result<()> {
    for role in registry.all_roles() {
        let dir = stage_root(root, registry, role)?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create stage directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Locate a project by id across every stage directory.
///
/// Checks `{stage_dir}/{id}` and `{stage_dir}/{any}/{id}`. Missing stage
/// directories are skipped, so lookup never creates anything.
pub fn find_project_by_id(
    root: &Path,
    registry: &StageRegistry,
    id: &str,
) -> Result<Option<PathBuf>> {
    crate::validation::validate_project_id(id)?;

    let mut matches = Vec::new();
    for role in registry.all_roles() {
        let stage_dir = stage_root(root, registry, role)?;
        if !stage_dir.is_dir() {
            continue;
        }

        let direct = stage_dir.join(id);
        if direct.is_dir() {
            matches.push(direct);
        }

        let entries = fs::read_dir(&stage_dir)
            .with_context(|| format!("Failed to read {}", stage_dir.display()))?;
        for entry in entries {
            let child = entry?.path();
            if !child.is_dir() {
                continue;
            }
            let candidate = child.join(id);
            if candidate.is_dir() {
                matches.push(candidate);
            }
        }
    }

    matches.sort();
    matches.dedup();
    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop()),
        _ => Err(TrellisError::AmbiguousProject {
            id: id.to_string(),
            matches,
        }),
    }
}

/// Resolve the project a command operates on.
///
/// An explicit path wins, then an id lookup under `root`, then the current
/// working directory.
pub fn resolve_project_path(
    path: Option<&Path>,
    id: Option<&str>,
    root: &Path,
    registry: &StageRegistry,
) -> Result<PathBuf> {
    if let Some(path) = path {
        let expanded = PathBuf::from(expand_tilde(&path.to_string_lossy()));
        return absolutize(&expanded);
    }
    if let Some(id) = id {
        return match find_project_by_id(root, registry, id)? {
            Some(found) => absolutize(&found),
            None => Err(TrellisError::NotFound { id: id.to_string() }),
        };
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    absolutize(&cwd)
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(fs::canonicalize(path)
            .with_context(|| format!("Failed to resolve {}", path.display()))?);
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

/// Project directories in one stage, direct and under a category, sorted.
///
/// A directory counts as a project when it holds a metadata record.
pub fn list_projects(
    root: &Path,
    registry: &StageRegistry,
    role: StageRole,
) -> Result<Vec<PathBuf>> {
    let stage_dir = stage_root(root, registry, role)?;
    if !stage_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut projects = Vec::new();
    for child in sorted_subdirs(&stage_dir)? {
        if record_path(&child).is_file() {
            projects.push(child);
            continue;
        }
        for grandchild in sorted_subdirs(&child)? {
            if record_path(&grandchild).is_file() {
                projects.push(grandchild);
            }
        }
    }
    Ok(projects)
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Generate an unused `AdjectiveNoun1234` id inside `stage_dir`.
pub fn generate_project_id(stage_dir: &Path) -> Result<String> {
    for _ in 0..ID_ATTEMPTS {
        let adjective = ADJECTIVES[rand::random_range(0..ADJECTIVES.len())];
        let noun = NOUNS[rand::random_range(0..NOUNS.len())];
        let number: u32 = rand::random_range(1000..10000);
        let candidate = format!("{adjective}{noun}{number}");
        if !stage_dir.join(&candidate).exists() {
            return Ok(candidate);
        }
    }
    Err(anyhow::anyhow!(
        "Unable to generate a unique project id in {}",
        stage_dir.display()
    )
    .into())
}

/// Write a starter source file for `lang`; returns the file written, if any.
///
/// Unknown languages are ignored.
pub fn create_starter_file(project_dir: &Path, lang: &str) -> Result<Option<PathBuf>> {
    let wanted = lang.trim().to_lowercase();
    let Some((_, filename, content)) = STARTERS
        .iter()
        .find(|(aliases, _, _)| aliases.contains(&wanted.as_str()))
    else {
        return Ok(None);
    };
    let path = project_dir.join(filename);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_base_structure() {
        let temp = TempDir::new().unwrap();
        let registry = StageRegistry::default();
        ensure_base_structure(temp.path(), &registry).unwrap();
        for dir in ["playground", "incubator", "products", "tools", "resources", "archives"] {
            assert!(temp.path().join(dir).is_dir(), "{dir} missing");
        }
    }

    #[test]
    fn test_find_direct_and_categorized() {
        let temp = TempDir::new().unwrap();
        let registry = StageRegistry::default();
        fs::create_dir_all(temp.path().join("playground/QuickFox1234")).unwrap();
        fs::create_dir_all(temp.path().join("products/Web/shop-front")).unwrap();

        let found = find_project_by_id(temp.path(), &registry, "QuickFox1234").unwrap();
        assert_eq!(found, Some(temp.path().join("playground/QuickFox1234")));

        let found = find_project_by_id(temp.path(), &registry, "shop-front").unwrap();
        assert_eq!(found, Some(temp.path().join("products/Web/shop-front")));

        assert_eq!(find_project_by_id(temp.path(), &registry, "nothing").unwrap(), None);
    }

    #[test]
    fn test_find_ambiguous() {
        let temp = TempDir::new().unwrap();
        let registry = StageRegistry::default();
        fs::create_dir_all(temp.path().join("incubator/Tools/widget")).unwrap();
        fs::create_dir_all(temp.path().join("archives/Games/widget")).unwrap();

        let err = find_project_by_id(temp.path(), &registry, "widget").unwrap_err();
        match err {
            TrellisError::AmbiguousProject { matches, .. } => assert_eq!(matches.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_find_does_not_create_stage_dirs() {
        let temp = TempDir::new().unwrap();
        let registry = StageRegistry::default();
        find_project_by_id(temp.path(), &registry, "widget").unwrap();
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_resolve_not_found() {
        let temp = TempDir::new().unwrap();
        let registry = StageRegistry::default();
        let err =
            resolve_project_path(None, Some("ghost"), temp.path(), &registry).unwrap_err();
        assert!(matches!(err, TrellisError::NotFound { .. }));
    }

    #[test]
    fn test_resolve_explicit_path_wins() {
        let temp = TempDir::new().unwrap();
        let registry = StageRegistry::default();
        let resolved =
            resolve_project_path(Some(temp.path()), Some("ghost"), temp.path(), &registry)
                .unwrap();
        assert_eq!(resolved, fs::canonicalize(temp.path()).unwrap());
    }

    #[test]
    fn test_list_projects() {
        let temp = TempDir::new().unwrap();
        let registry = StageRegistry::default();
        for dir in [
            "incubator/Web/shop",
            "incubator/Tools/widget",
            "incubator/loose",
            "incubator/Web/empty",
        ] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        for dir in ["incubator/Web/shop", "incubator/Tools/widget", "incubator/loose"] {
            fs::write(temp.path().join(dir).join("project.yaml"), "id: x\n").unwrap();
        }

        let found = list_projects(temp.path(), &registry, StageRole::Incubator).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["incubator/Tools/widget", "incubator/Web/shop", "incubator/loose"]
        );
        assert!(list_projects(temp.path(), &registry, StageRole::Tool).unwrap().is_empty());
    }

    #[test]
    fn test_generate_project_id_shape() {
        let temp = TempDir::new().unwrap();
        let id = generate_project_id(temp.path()).unwrap();
        let digits: String = id.chars().rev().take(4).collect();
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        assert!(ADJECTIVES.iter().any(|a| id.starts_with(a)));
        assert!(!temp.path().join(&id).exists());
    }

    #[test]
    fn test_starter_files() {
        let temp = TempDir::new().unwrap();
        let written = create_starter_file(temp.path(), "JavaScript").unwrap();
        assert_eq!(written, Some(temp.path().join("main.js")));
        assert!(create_starter_file(temp.path(), "cobol").unwrap().is_none());

        create_starter_file(temp.path(), "rust").unwrap();
        let content = fs::read_to_string(temp.path().join("main.rs")).unwrap();
        assert!(content.contains("fn main()"));
    }
}
