//! End-to-end tests for trellis
//!
//! Every test runs against a throwaway projects root with git and GitHub
//! disabled and a scripted metadata generator, so no network, `git` or `gh`
//! is needed.

pub mod archive;
pub mod describe;
pub mod helpers;
pub mod lifecycle;
pub mod lookup;

pub use helpers::*;
