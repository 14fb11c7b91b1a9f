//! Locates the user's `config.toml`.
//!
//! A `.tabstops/` directory in the start directory or any ancestor wins over
//! the system config directory (`<config_dir>/tabstops/`).

use std::path::{Path, PathBuf};

const PROJECT_DIR: &str = ".tabstops";
const CONFIG_FILE: &str = "config.toml";

pub fn discover(start_dir: &Path) -> Option<PathBuf> {
    let dir = walk_ancestors(start_dir).or_else(system_config_dir)?;
    let config = dir.join(CONFIG_FILE);
    if config.is_file() {
        tracing::info!("using config {}", config.display());
        Some(config)
    } else {
        tracing::debug!("no config.toml in {}", dir.display());
        None
    }
}

fn walk_ancestors(start_dir: &Path) -> Option<PathBuf> {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(PROJECT_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

fn system_config_dir() -> Option<PathBuf> {
    let dir = dirs::config_dir()?.join("tabstops");
    dir.is_dir().then_some(dir)
}
