//! Process runner for `git` and `gh`.
//!
//! Centralizes spawning, working directory and error conversion so callers
//! only deal with trimmed stdout or a [`TrellisError::Command`].

use anyhow::Context;
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

use crate::error::{Result, TrellisError};

/// Run a command and return the raw Output.
pub fn run_tool(program: &str, args: &[&str], dir: &Path) -> anyhow::Result<Output> {
    debug!("Running `{program} {}` in {}", args.join(" "), dir.display());
    Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("Failed to execute: {program} {}", args.join(" ")))
}

/// Run a command, check for success, and return stdout trimmed.
///
/// A non-zero exit becomes [`TrellisError::Command`] carrying stderr.
pub fn run_checked(program: &str, args: &[&str], dir: &Path) -> Result<String> {
    let command = format!("{program} {}", args.join(" "));
    let output = run_tool(program, args, dir)
        .map_err(|e| TrellisError::command(command.clone(), format!("{e:#}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("exit status {}", output.status.code().unwrap_or(-1))
        } else {
            stderr
        };
        return Err(TrellisError::command(command, message));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a command and return true if the exit code is 0.
///
/// Spawn failures count as false.
pub fn run_bool(program: &str, args: &[&str], dir: &Path) -> bool {
    run_tool(program, args, dir)
        .map(|output| output.status.success())
        .unwrap_or(false)
}

pub fn run_git(args: &[&str], dir: &Path) -> Result<String> {
    run_checked("git", args, dir)
}

pub fn run_git_bool(args: &[&str], dir: &Path) -> bool {
    run_bool("git", args, dir)
}
