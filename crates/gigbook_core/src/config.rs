//! Runtime configuration loaded from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `GIGBOOK_DB_PATH` | `<temp dir>/gigbook.sqlite3` |
//! | `GIGBOOK_LOG_LEVEL` | `debug` in debug builds, `info` otherwise |
//! | `GIGBOOK_LOG_DIR` | unset (file logging disabled) |
//! | `GIGBOOK_UPCOMING_LIMIT` | `5` |
//! | `GIGBOOK_STATUS_POLICY` | `open` (`strict` opt-in) |

use crate::logging::default_log_level;
use crate::model::event::StatusPolicy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "GIGBOOK_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "GIGBOOK_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "GIGBOOK_LOG_DIR";
pub const UPCOMING_LIMIT_VAR: &str = "GIGBOOK_UPCOMING_LIMIT";
pub const STATUS_POLICY_VAR: &str = "GIGBOOK_STATUS_POLICY";

pub const DEFAULT_UPCOMING_LIMIT: usize = 5;
const DEFAULT_DB_FILE: &str = "gigbook.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable is set but its value cannot be used.
    InvalidValue { var: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { var, value } => write!(f, "invalid value `{value}` for {var}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub upcoming_limit: usize,
    pub status_policy: StatusPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
            status_policy: StatusPolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_VAR) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(LOG_LEVEL_VAR) {
            config.log_level = level;
        }
        config.log_dir = read(LOG_DIR_VAR).map(PathBuf::from);
        if let Some(raw) = read(UPCOMING_LIMIT_VAR) {
            config.upcoming_limit = raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: UPCOMING_LIMIT_VAR,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = read(STATUS_POLICY_VAR) {
            config.status_policy =
                StatusPolicy::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                    var: STATUS_POLICY_VAR,
                    value: raw.clone(),
                })?;
        }

        Ok(config)
    }
}
