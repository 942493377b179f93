//! Persisted connection settings.
//!
//! The configuration file is YAML holding the settings of the selected
//! engine. Fields the engine's capabilities do not enable are never
//! written, and neither is the password when it is asked for interactively.

pub mod paths;


use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::db::DatabaseSettings;
use crate::db::StoreFactory;
use crate::db::sqlite::SqliteFactory;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {}", path.display())]
    #[diagnostic(code(growbook::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write config file {}", path.display())]
    #[diagnostic(code(growbook::config::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}", path.display())]
    #[diagnostic(
        code(growbook::config::parse),
        help("Fix the YAML by hand or delete the file to fall back to the defaults.")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Could not serialize settings")]
    #[diagnostic(code(growbook::config::serialize))]
    Serialize(#[source] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
}

impl Default for Config {
    /// Embedded SQLite database in the data directory.
    fn default() -> Self {
        Self {
            database: SqliteFactory.default_settings(),
        }
    }
}

impl Config {
    /// Load the config at `path`, or the defaults when the file does not exist.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the sanitized settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let text = self.to_yaml()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), engine = %self.database.engine, "Saved config");
        Ok(())
    }

    /// YAML form of the config as it would be saved.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let sanitized = Self {
            database: self.database.sanitized(),
        };
        serde_yaml::to_string(&sanitized).map_err(ConfigError::Serialize)
    }
}
