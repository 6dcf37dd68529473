//! Optional YAML configuration file

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Settings read from `--config`. Absent keys fall back to defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Collect every schema violation instead of stopping at the first
    pub verbose: bool,
    /// Treat warnings as failures
    pub deny_warnings: bool,
}

impl CliConfig {
    /// Load the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // an empty file is a valid, empty configuration
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Apply command-line flags; a flag that is set always wins
    #[must_use]
    pub fn with_flags(self, verbose: bool, deny_warnings: bool) -> Self {
        Self {
            verbose: self.verbose || verbose,
            deny_warnings: self.deny_warnings || deny_warnings,
        }
    }
}
