//! Application configuration loaded from TOML and overridden by flags.

use std::path::{Path, PathBuf};

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::Cli;

/// Runtime settings for the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// File read by `L` and written by `G`.
    #[serde(default = "default_data_file")]
    data_file: PathBuf,

    /// Tracing filter used when neither `--log-filter` nor `RUST_LOG` is set.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

#[instrument]
fn default_data_file() -> PathBuf {
    PathBuf::from("game.data")
}

#[instrument]
fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(data_file = %config.data_file.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Builds the effective configuration: flags override the file, the
    /// file overrides defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `--config` names a file that cannot be
    /// read or parsed.
    #[instrument(skip(cli))]
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(data_file) = &cli.data_file {
            config.data_file = data_file.clone();
        }
        if let Some(filter) = &cli.log_filter {
            config.log_filter = filter.clone();
        }
        debug!(?config, "Configuration resolved");
        Ok(config)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
