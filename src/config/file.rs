//! `config.toml` persistence for `trellis set`.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::{EnvMap, LlmProvider};
use crate::error::{Result, TrellisError};

/// Keys accepted by `trellis set`.
pub const CONFIG_KEYS: &[&str] = &[
    "root",
    "llm",
    "llm_key",
    "llm_model",
    "openai_model",
    "gemini_model",
    "max_retries",
];

/// Contents of `~/.config/trellis/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

/// Location of `config.toml`; `TRELLIS_CONFIG_PATH` overrides the default.
pub fn config_file_path(env: &EnvMap) -> Option<PathBuf> {
    if let Some(path) = env.get("TRELLIS_CONFIG_PATH").filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(super::expand_tilde(path.trim())));
    }
    dirs::home_dir().map(|home| home.join(".config").join("trellis").join("config.toml"))
}

impl ConfigFile {
    /// Read the file, returning defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content)
            .map_err(|e| TrellisError::config(format!("Failed to parse {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| TrellisError::config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Validate and apply one `key value` pair.
    ///
    /// Keys are case-insensitive and accept dashes for underscores. Returns
    /// the normalized key.
    pub fn set_value(&mut self, raw_key: &str, raw_value: &str) -> Result<String> {
        let key = raw_key.trim().to_lowercase().replace('-', "_");
        let value = raw_value.trim().to_string();

        match key.as_str() {
            "root" => self.root = Some(require_value(&key, value)?),
            "llm" => {
                let provider = value.parse::<LlmProvider>()?;
                self.llm = Some(provider.key().to_string());
            }
            "llm_key" => self.llm_key = Some(require_value(&key, value)?),
            "llm_model" => self.llm_model = Some(require_value(&key, value)?),
            "openai_model" => self.openai_model = Some(require_value(&key, value)?),
            "gemini_model" => self.gemini_model = Some(require_value(&key, value)?),
            "max_retries" => {
                let retries = value.parse::<u32>().map_err(|_| {
                    TrellisError::config(format!("max_retries must be a number, got '{value}'"))
                })?;
                self.max_retries = Some(retries);
            }
            _ => {
                return Err(TrellisError::config(format!(
                    "Unsupported config key: {key}. Valid keys: {}",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(key)
    }
}

fn require_value(key: &str, value: String) -> Result<String> {
    if value.is_empty() {
        return Err(TrellisError::config(format!("{key} cannot be empty.")));
    }
    Ok(value)
}
