// src/core/config_resolver.rs

use crate::constants::DEFAULT_API_BASE_URL;
use crate::core::paths::{self, PathError};
use crate::models::{AppConfig, ConfigFile, ConfigSource};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Filesystem Error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error parsing TOML in '{path}': {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Error serializing configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Configuration file '{0}' does not exist.")]
    ExplicitFileNotFound(String),
    #[error("Path Error: {0}")]
    Path(#[from] PathError),
    #[error("Invalid API base URL '{0}': it must start with http:// or https://")]
    InvalidBaseUrl(String),
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Where the global layer comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalLayer {
    /// `<config_dir>/mtc/config.toml`, created with defaults when missing.
    UserDefault(PathBuf),
    /// A file named with `--config`; it must exist.
    Explicit(PathBuf),
}

/// All inputs of configuration resolution, gathered once at process start.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    pub global: GlobalLayer,
    pub project_dir: PathBuf,
    pub env_api_base_url: Option<String>,
    pub flag_api_base_url: Option<String>,
}

impl ConfigResolver {
    /// Builds a resolver from the process environment and command-line flags.
    pub fn from_environment(
        explicit_config: Option<&str>,
        flag_api_base_url: Option<String>,
    ) -> ConfigResult<Self> {
        let global = match explicit_config {
            Some(raw) => GlobalLayer::Explicit(paths::expand_user_path(raw)?),
            None => GlobalLayer::UserDefault(paths::get_global_config_path()?),
        };
        let project_dir = std::env::current_dir().map_err(|e| ConfigError::Io {
            path: ".".to_string(),
            source: e,
        })?;
        let env_api_base_url = std::env::var(crate::constants::API_BASE_URL_ENV).ok();

        Ok(Self {
            global,
            project_dir,
            env_api_base_url,
            flag_api_base_url,
        })
    }

    /// Merges every layer into an immutable `AppConfig`.
    /// Precedence: flag > environment > project file > global file > default.
    pub fn resolve(&self) -> ConfigResult<AppConfig> {
        let mut api_base_url = DEFAULT_API_BASE_URL.to_string();
        let mut source = ConfigSource::Default;

        let global_file = match &self.global {
            GlobalLayer::UserDefault(path) => {
                Some((path.clone(), load_or_create_global(path)?))
            }
            GlobalLayer::Explicit(path) => {
                if !path.is_file() {
                    return Err(ConfigError::ExplicitFileNotFound(path.display().to_string()));
                }
                Some((path.clone(), read_config_file(path)?))
            }
        };
        if let Some((path, file)) = global_file {
            if let Some(url) = file.api_base_url {
                log::debug!("api_base_url from global config '{}'.", path.display());
                api_base_url = url;
                source = ConfigSource::Global(path);
            }
        }

        let project_config_path = paths::project_config_path(&self.project_dir);
        let project_config_present = project_config_path.is_file();
        if project_config_present {
            if let Some(url) = read_config_file(&project_config_path)?.api_base_url {
                log::debug!(
                    "api_base_url from project config '{}'.",
                    project_config_path.display()
                );
                api_base_url = url;
                source = ConfigSource::Project(project_config_path.clone());
            }
        }

        if let Some(url) = non_empty(self.env_api_base_url.as_deref()) {
            log::debug!("api_base_url from environment.");
            api_base_url = url.to_string();
            source = ConfigSource::Environment;
        }

        if let Some(url) = non_empty(self.flag_api_base_url.as_deref()) {
            log::debug!("api_base_url from command line.");
            api_base_url = url.to_string();
            source = ConfigSource::Flag;
        }

        Ok(AppConfig {
            api_base_url: validate_base_url(&api_base_url)?,
            api_base_url_source: source,
            project_config_path,
            project_config_present,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Trims trailing slashes so endpoint paths can be appended directly.
pub fn validate_base_url(raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn read_config_file(path: &Path) -> ConfigResult<ConfigFile> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.display().to_string(),
        source: e,
    })
}

pub fn write_config_file(path: &Path, config: &ConfigFile) -> ConfigResult<()> {
    let toml_string = toml::to_string_pretty(config)?;
    fs::write(path, toml_string).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Reads the global config, writing one with the default base URL on first run.
fn load_or_create_global(path: &Path) -> ConfigResult<ConfigFile> {
    if path.exists() {
        return read_config_file(path);
    }
    let default_config = ConfigFile {
        api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
    };
    log::debug!("Writing default global config to '{}'.", path.display());
    write_config_file(path, &default_config)?;
    Ok(default_config)
}
