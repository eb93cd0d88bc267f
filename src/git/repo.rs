use std::path::Path;
use tracing::info;

use super::runner::{run_git, run_git_bool};
use crate::error::{Result, TrellisError};

/// Fail with `ExternalToolMissing` unless `tool` is on PATH.
pub fn require_tool(tool: &str) -> Result<()> {
    if which::which(tool).is_ok() {
        return Ok(());
    }
    let hint = match tool {
        "git" => "install git, or pass --no-github without --git",
        "gh" => "install the GitHub CLI (https://cli.github.com) or pass --no-github",
        _ => "install it and try again",
    };
    Err(TrellisError::tool_missing(tool, hint))
}

/// `git init -b main` unless the directory already has a `.git`.
///
/// Returns whether a repository was created.
pub fn init_repo(dir: &Path) -> Result<bool> {
    if dir.join(".git").exists() {
        return Ok(false);
    }
    run_git(&["init", "-b", "main"], dir)?;
    info!("Initialized git repository in {}", dir.display());
    Ok(true)
}

/// Whether `git status --porcelain` reports anything.
pub fn has_changes(dir: &Path) -> Result<bool> {
    Ok(!run_git(&["status", "--porcelain"], dir)?.is_empty())
}

/// Stage everything and commit.
pub fn commit_all(dir: &Path, message: &str) -> Result<()> {
    run_git(&["add", "-A"], dir)?;
    run_git(&["commit", "-m", message], dir)?;
    Ok(())
}

/// Whether the repository has at least one commit.
pub fn has_head(dir: &Path) -> bool {
    run_git_bool(&["rev-parse", "--verify", "HEAD"], dir)
}

/// `git push -u origin HEAD`.
pub fn push_head(dir: &Path) -> Result<()> {
    run_git(&["push", "-u", "origin", "HEAD"], dir)?;
    Ok(())
}
