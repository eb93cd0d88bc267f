//! GitHub repository creation through `gh`.

use std::path::Path;
use tracing::warn;

use super::runner::run_checked;
use crate::error::Result;

/// `gh repo create <slug> --private --source . --remote origin`.
pub fn create_remote_repo(dir: &Path, slug: &str) -> Result<()> {
    run_checked(
        "gh",
        &["repo", "create", slug, "--private", "--source", ".", "--remote", "origin"],
        dir,
    )?;
    Ok(())
}

/// URL of the repository linked to `dir`, or an empty string if it cannot be read.
pub fn remote_repo_url(dir: &Path) -> String {
    match run_checked("gh", &["repo", "view", "--json", "url", "-q", ".url"], dir) {
        Ok(url) => url,
        Err(e) => {
            warn!("Could not read back repository url: {e}");
            String::new()
        }
    }
}
