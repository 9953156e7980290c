//! Runtime configuration resolved from the environment.
//!
//! | Variable             | Default                     |
//! |----------------------|-----------------------------|
//! | `JOTS_DB_PATH`       | `<temp dir>/jots.sqlite3`   |
//! | `JOTS_STORAGE_KEY`   | `jot-app`                   |
//! | `JOTS_LOG_LEVEL`     | `debug` / `info` by build   |
//! | `JOTS_LOG_DIR`       | unset (logging disabled)    |
//! | `JOTS_ID_ASSIGNMENT` | `positional`                |
//! | `JOTS_COLOR_SEED`    | unset (OS entropy)          |
//!
//! Blank values are treated as unset.

use crate::logging::{default_log_level, normalize_level};
use crate::repo::jot_repo::{IdAssignment, DEFAULT_STORAGE_KEY};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "JOTS_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "JOTS_STORAGE_KEY";
pub const ENV_LOG_LEVEL: &str = "JOTS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "JOTS_LOG_DIR";
pub const ENV_ID_ASSIGNMENT: &str = "JOTS_ID_ASSIGNMENT";
pub const ENV_COLOR_SEED: &str = "JOTS_COLOR_SEED";

const DEFAULT_DB_FILE_NAME: &str = "jots.sqlite3";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}=`{}`: {}", self.key, self.value, self.reason)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JotsConfig {
    pub db_path: PathBuf,
    pub storage_key: String,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
    pub id_assignment: IdAssignment,
    pub color_seed: Option<u64>,
}

impl Default for JotsConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level(),
            log_dir: None,
            id_assignment: IdAssignment::default(),
            color_seed: None,
        }
    }
}

impl JotsConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = read(ENV_STORAGE_KEY) {
            config.storage_key = key;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|err| ConfigError {
                key: ENV_LOG_LEVEL,
                value: level.clone(),
                reason: err.to_string(),
            })?;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(value) = read(ENV_ID_ASSIGNMENT) {
            config.id_assignment = IdAssignment::parse(&value).ok_or_else(|| ConfigError {
                key: ENV_ID_ASSIGNMENT,
                value: value.clone(),
                reason: "expected positional|preserve".to_string(),
            })?;
        }
        if let Some(value) = read(ENV_COLOR_SEED) {
            config.color_seed = Some(value.parse::<u64>().map_err(|err| ConfigError {
                key: ENV_COLOR_SEED,
                value: value.clone(),
                reason: err.to_string(),
            })?);
        }

        Ok(config)
    }
}
