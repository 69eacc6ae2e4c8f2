// src/core/paths.rs

use crate::constants::{CONFIG_DIR_NAME, GLOBAL_CONFIG_FILENAME, PROJECT_CONFIG_FILENAME};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to expand path '{path}': {message}")]
    Expansion { path: String, message: String },
}

/// Returns the path to the mtc configuration directory (`~/.config/mtc`).
/// Creates it if it doesn't exist.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(CONFIG_DIR_NAME);

    if !config_path.exists() {
        log::debug!("Creating config directory at '{}'.", config_path.display());
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    Ok(config_path)
}

/// Returns the path to the global `config.toml` file.
pub fn get_global_config_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILENAME))
}

/// The project config file lives directly in the directory the user submits from.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    dunce::simplified(project_dir).join(PROJECT_CONFIG_FILENAME)
}

/// Expands `~` in a user-supplied path (e.g. `--config ~/mtc/dev.toml`).
pub fn expand_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}
