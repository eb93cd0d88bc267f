//! Version-control side effects of a promotion.
//!
//! Everything here shells out to `git` or the GitHub CLI `gh`, always with the
//! project directory as the working directory.

pub mod forge;
pub mod repo;
pub mod runner;

pub use forge::{create_remote_repo, remote_repo_url};
pub use repo::{commit_all, has_changes, has_head, init_repo, push_head, require_tool};
