//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Resolve the SQLite path holding the key-value slots.
//! - Resolve logging level and optional log directory.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; unsupported log levels are rejected later by
//!   `init_logging`.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "SPORTGEAR_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "SPORTGEAR_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "SPORTGEAR_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "sportgear.sqlite3";

/// Effective core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the key-value slots.
    pub db_path: PathBuf,
    /// Log level passed to `init_logging`.
    pub log_level: String,
    /// Log directory; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Resolves configuration from `SPORTGEAR_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: non_blank(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: non_blank(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoreConfig::from_lookup(|_| None);
        assert!(config.db_path.ends_with("sportgear.sqlite3"));
        assert_eq!(config.log_level, default_log_level());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn explicit_values_override_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (DB_PATH_ENV, " /data/gear.sqlite3 "),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "   "),
        ]);
        let config = CoreConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.db_path, PathBuf::from("/data/gear.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert!(config.log_dir.is_none());
    }
}
