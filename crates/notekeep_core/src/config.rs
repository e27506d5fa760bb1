//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Resolve DB location, logging and ownership settings from environment
//!   variables with documented defaults.
//! - Reject malformed values instead of silently falling back.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - `log_dir`, when set, must be absolute (same rule as `init_logging`).

use crate::logging::default_log_level;
use crate::service::note_service::OwnershipPolicy;
use crate::summary::summarizer::DEFAULT_SUMMARY_MAX_CHARS;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "NOTEKEEP_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "NOTEKEEP_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTEKEEP_LOG_DIR";
pub const ENV_OWNERSHIP: &str = "NOTEKEEP_OWNERSHIP";
pub const ENV_SUMMARY_MAX_CHARS: &str = "NOTEKEEP_SUMMARY_MAX_CHARS";

const DEFAULT_DB_FILE_NAME: &str = "notekeep.sqlite3";

/// Configuration parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
    pub ownership_policy: OwnershipPolicy,
    pub summary_max_chars: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            ownership_policy: OwnershipPolicy::default(),
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
        }
    }
}

impl CoreConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }

        if let Some(dir) = read(ENV_LOG_DIR) {
            let path = PathBuf::from(&dir);
            if !path.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_LOG_DIR,
                    value: dir,
                    reason: "must be an absolute path".to_string(),
                });
            }
            config.log_dir = Some(path);
        }

        if let Some(policy) = read(ENV_OWNERSHIP) {
            config.ownership_policy =
                policy
                    .parse()
                    .map_err(|reason| ConfigError::InvalidValue {
                        key: ENV_OWNERSHIP,
                        value: policy.clone(),
                        reason,
                    })?;
        }

        if let Some(raw) = read(ENV_SUMMARY_MAX_CHARS) {
            config.summary_max_chars = match raw.parse::<usize>() {
                Ok(value) if value > 0 => value,
                Ok(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_SUMMARY_MAX_CHARS,
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Err(err) => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_SUMMARY_MAX_CHARS,
                        value: raw,
                        reason: err.to_string(),
                    });
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_OWNERSHIP, ENV_SUMMARY_MAX_CHARS,
    };
    use crate::service::note_service::OwnershipPolicy;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.ownership_policy, OwnershipPolicy::Strict);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn reads_overrides_and_ignores_blank_values() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/notes.db"),
            (ENV_OWNERSHIP, " LEGACY "),
            (ENV_SUMMARY_MAX_CHARS, "80"),
            (ENV_LOG_DIR, "  "),
        ]))
        .expect("config");
        assert_eq!(config.db_path, PathBuf::from("/tmp/notes.db"));
        assert_eq!(config.ownership_policy, OwnershipPolicy::Legacy);
        assert_eq!(config.summary_max_chars, 80);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn rejects_unknown_policy_relative_log_dir_and_zero_budget() {
        let policy = CoreConfig::from_lookup(lookup(&[(ENV_OWNERSHIP, "open")]));
        assert!(matches!(
            policy,
            Err(ConfigError::InvalidValue { key, .. }) if key == ENV_OWNERSHIP
        ));

        let dir = CoreConfig::from_lookup(lookup(&[(ENV_LOG_DIR, "logs")]));
        assert!(matches!(
            dir,
            Err(ConfigError::InvalidValue { key, .. }) if key == ENV_LOG_DIR
        ));

        let budget = CoreConfig::from_lookup(lookup(&[(ENV_SUMMARY_MAX_CHARS, "0")]));
        assert!(budget.is_err());
    }
}
