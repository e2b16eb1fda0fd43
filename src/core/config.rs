//! Optional TOML configuration.
//!
//! The file is looked up in this order:
//! 1. an explicit path (the `--config` flag),
//! 2. the `BAMGEN_CONFIG` environment variable,
//! 3. `<config dir>/bamgen/config.toml` (e.g. `~/.config/bamgen/config.toml`).
//!
//! An explicit path that does not exist is an error. A missing default file
//! simply means defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::extraction::ExtractionOptions;

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "BAMGEN_CONFIG";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file '{path}': {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Generation defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Template used when the command line does not name one
    pub template: Option<PathBuf>,
}

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub extraction: ExtractionOptions,
    pub generation: GenerationConfig,
}

/// Source of configuration lookup locations, injectable for tests
pub trait ConfigLocator {
    fn env_override(&self) -> Option<String>;
    fn config_dir(&self) -> Option<PathBuf>;
}

/// Production locator backed by the process environment
pub struct SystemConfigLocator;

impl ConfigLocator for SystemConfigLocator {
    fn env_override(&self) -> Option<String> {
        std::env::var(CONFIG_ENV_VAR).ok()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        dirs::config_dir()
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid {
            path: origin.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Load configuration using the process environment for discovery
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit, &SystemConfigLocator)
    }

    /// Load configuration with a custom locator
    pub fn load_with(
        explicit: Option<&Path>,
        locator: &dyn ConfigLocator,
    ) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match locator.env_override() {
                Some(value) if !value.trim().is_empty() => (PathBuf::from(value.trim()), true),
                _ => match locator.config_dir() {
                    Some(dir) => (dir.join("bamgen").join("config.toml"), false),
                    None => {
                        debug!("No configuration directory available, using defaults");
                        return Ok(Self::default());
                    }
                },
            },
        };

        if !required && !path.is_file() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Unreadable {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_toml(&content, &path)
    }
}

#[cfg(test)]
pub struct MockConfigLocator {
    pub env_override: Option<String>,
    pub config_dir: Option<PathBuf>,
}

#[cfg(test)]
impl ConfigLocator for MockConfigLocator {
    fn env_override(&self) -> Option<String> {
        self.env_override.clone()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir.clone()
    }
}
