use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Snapshot of environment variables.
pub type EnvMap = HashMap<String, String>;

/// `.env` locations, lowest precedence first.
///
/// `TRELLIS_ENV_PATH` is read first, then the user config file, then `./.env`.
pub fn candidate_env_paths(process_env: &EnvMap) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = process_env.get("TRELLIS_ENV_PATH") {
        if !path.trim().is_empty() {
            paths.push(PathBuf::from(super::expand_tilde(path.trim())));
        }
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("trellis").join(".env"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".env"));
    }
    paths
}

/// Merge `.env` files with the process environment.
///
/// The process environment always wins. Files are parsed with dotenvy's
/// iterator API so nothing is exported into this process.
pub fn load_env() -> EnvMap {
    let process_env: EnvMap = std::env::vars().collect();
    let mut merged = EnvMap::new();

    for path in candidate_env_paths(&process_env) {
        if !path.is_file() {
            continue;
        }
        match dotenvy::from_path_iter(&path) {
            Ok(iter) => {
                let mut count = 0;
                for item in iter {
                    match item {
                        Ok((key, value)) => {
                            merged.insert(key, value);
                            count += 1;
                        }
                        Err(e) => warn!("Skipping malformed line in {}: {e}", path.display()),
                    }
                }
                debug!("Loaded {count} entries from {}", path.display());
            }
            Err(e) => warn!("Failed to read {}: {e}", path.display()),
        }
    }

    merged.extend(process_env);
    merged
}
