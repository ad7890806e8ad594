//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Collect database and logging settings from the environment or from a
//!   deserialized host config.
//! - Turn settings into an open, migrated connection.
//!
//! # Invariants
//! - An absent `db_path` selects a private in-memory database.
//! - An absent `log_dir` leaves logging uninitialized.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment variable holding the database file path.
pub const ENV_DB_PATH: &str = "SOLARSYS_DB_PATH";
/// Environment variable holding the log level.
pub const ENV_LOG_LEVEL: &str = "SOLARSYS_LOG_LEVEL";
/// Environment variable holding the absolute log directory.
pub const ENV_LOG_DIR: &str = "SOLARSYS_LOG_DIR";

/// Malformed `SOLARSYS_*` environment variable.
#[derive(Debug)]
pub enum ConfigError {
    /// Variable is set but not valid unicode.
    NotUnicode(&'static str),
    /// Variable is set to an empty or whitespace-only value.
    Empty(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotUnicode(name) => write!(f, "environment variable {name} is not valid unicode"),
            Self::Empty(name) => write!(f, "environment variable {name} must not be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Core settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `SOLARSYS_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name))
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Result<String, std::env::VarError>,
    ) -> Result<Self, ConfigError> {
        let read = |name: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(name) {
                Ok(value) if value.trim().is_empty() => Err(ConfigError::Empty(name)),
                Ok(value) => Ok(Some(value.trim().to_string())),
                Err(std::env::VarError::NotPresent) => Ok(None),
                Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(name)),
            }
        };

        let defaults = Self::default();
        Ok(Self {
            db_path: read(ENV_DB_PATH)?.map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL)?.unwrap_or(defaults.log_level),
            log_dir: read(ENV_LOG_DIR)?.map(PathBuf::from),
        })
    }

    /// Starts logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging is not configured.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match &self.log_dir {
            Some(dir) => init_logging(&self.log_level, dir).map(|()| true),
            None => Ok(false),
        }
    }

    /// Opens the configured database with migrations applied.
    pub fn open_database(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}
