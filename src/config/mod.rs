//! Runtime settings.
//!
//! Settings are assembled once in `main` from three sources and then passed by
//! reference to everything that needs them:
//!
//! - `config.toml` under `~/.config/trellis/` (written by `trellis set`)
//! - the process environment
//! - `.env` files, read without touching the process environment
//!
//! [`Settings::from_sources`] takes those sources as plain values so tests can
//! build settings without mutating global state.

mod env;
mod file;

pub use env::{candidate_env_paths, load_env, EnvMap};
pub use file::{config_file_path, ConfigFile, CONFIG_KEYS};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, TrellisError};
use crate::models::StageRole;

/// Default number of extra attempts after a failed generator request.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Supported metadata generator backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Gemini,
}

impl LlmProvider {
    pub const fn key(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Gemini => "gemini",
        }
    }

    pub const fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::Gemini => "gemini-1.5-flash",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "gemini" => Ok(LlmProvider::Gemini),
            other => Err(TrellisError::config(format!(
                "Invalid llm provider '{other}'. Use: openai or gemini."
            ))),
        }
    }
}

/// Generator backend selection.
#[derive(Debug, Clone, Default)]
pub struct LlmSettings {
    /// `None` selects the deterministic stub generator.
    pub provider: Option<LlmProvider>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub openai_model: Option<String>,
    pub gemini_model: Option<String>,
    pub max_retries: u32,
}

impl LlmSettings {
    /// Model for a provider: provider-specific key, then `llm_model`, then the default.
    pub fn model_for(&self, provider: LlmProvider) -> String {
        let specific = match provider {
            LlmProvider::OpenAi => self.openai_model.as_ref(),
            LlmProvider::Gemini => self.gemini_model.as_ref(),
        };
        specific
            .or(self.model.as_ref())
            .cloned()
            .unwrap_or_else(|| provider.default_model().to_string())
    }
}

/// Fully resolved settings for one process.
#[derive(Debug, Clone)]
pub struct Settings {
    pub projects_root: PathBuf,
    pub stage_dirs: BTreeMap<StageRole, String>,
    pub stage_labels: BTreeMap<StageRole, String>,
    pub llm: LlmSettings,
}

impl Settings {
    /// Load settings from the real environment, `.env` files and `config.toml`.
    pub fn load() -> Result<Self> {
        let env = load_env();
        let file = match config_file_path(&env) {
            Some(path) => ConfigFile::load(&path)?,
            None => ConfigFile::default(),
        };
        Self::from_sources(&env, &file)
    }

    /// Build settings from explicit sources.
    ///
    /// `config.toml` wins over environment keys for the values both can set.
    pub fn from_sources(env: &EnvMap, file: &ConfigFile) -> Result<Self> {
        let projects_root = resolve_projects_root(env, file);

        let mut stage_dirs = BTreeMap::new();
        let mut stage_labels = BTreeMap::new();
        for role in StageRole::ALL {
            let suffix = role.env_suffix();
            if let Some(dir) = non_empty(env.get(&format!("TRELLIS_STAGE_{suffix}_DIR"))) {
                stage_dirs.insert(role, dir);
            }
            if let Some(label) = non_empty(env.get(&format!("TRELLIS_STAGE_{suffix}_LABEL"))) {
                stage_labels.insert(role, label);
            }
        }

        let provider = match non_empty(file.llm.as_ref()).or_else(|| non_empty(env.get("TRELLIS_LLM"))) {
            Some(raw) => Some(raw.parse::<LlmProvider>()?),
            None => None,
        };

        let llm = LlmSettings {
            provider,
            api_key: non_empty(file.llm_key.as_ref())
                .or_else(|| non_empty(env.get("TRELLIS_LLM_KEY"))),
            model: non_empty(file.llm_model.as_ref())
                .or_else(|| non_empty(env.get("TRELLIS_LLM_MODEL"))),
            openai_model: non_empty(file.openai_model.as_ref()),
            gemini_model: non_empty(file.gemini_model.as_ref()),
            max_retries: file.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        };

        Ok(Self {
            projects_root,
            stage_dirs,
            stage_labels,
            llm,
        })
    }

    /// Default settings rooted at `root`, with no overrides and the stub generator.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            projects_root: root.into(),
            stage_dirs: BTreeMap::new(),
            stage_labels: BTreeMap::new(),
            llm: LlmSettings {
                max_retries: DEFAULT_MAX_RETRIES,
                ..LlmSettings::default()
            },
        }
    }

    /// Replace the projects root (the `--root` flag).
    #[must_use]
    pub fn with_projects_root(mut self, root: &Path) -> Self {
        self.projects_root = PathBuf::from(expand_tilde(&root.to_string_lossy()));
        self
    }
}

/// Projects root: `config.toml` root, `TRELLIS_ROOT`, `PROJECTS_DIRECTORY`, then
/// `~/Documents/Projects`.
fn resolve_projects_root(env: &EnvMap, file: &ConfigFile) -> PathBuf {
    let raw = non_empty(file.root.as_ref())
        .or_else(|| non_empty(env.get("TRELLIS_ROOT")))
        .or_else(|| non_empty(env.get("PROJECTS_DIRECTORY")))
        .unwrap_or_else(|| "~/Documents/Projects".to_string());
    PathBuf::from(expand_tilde(&raw))
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Expand ~ to home directory in paths
pub fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
