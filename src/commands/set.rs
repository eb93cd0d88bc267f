//! `trellis set`: persist one config value to `config.toml`.

use std::path::Path;
use tracing::info;

use super::print_done;
use crate::config::{config_file_path, load_env, ConfigFile};
use crate::error::{Result, TrellisError};

pub fn execute(key: &str, value: &str) -> Result<()> {
    let env = load_env();
    let path = config_file_path(&env)
        .ok_or_else(|| TrellisError::config("Cannot locate a home directory for config.toml."))?;
    let key = apply(&path, key, value)?;
    print_done(format!("{key} updated."));
    Ok(())
}

/// Validate `key value`, write it to the config file at `path` and return the
/// normalized key.
pub fn apply(path: &Path, key: &str, value: &str) -> Result<String> {
    let mut config = ConfigFile::load(path)?;
    let key = config.set_value(key, value)?;
    config.save(path)?;
    info!("Set {key} in {}", path.display());
    Ok(key)
}
