//! Runtime configuration for hosts embedding the core.
//!
//! # Invariants
//! - Defaults depend only on build mode, never on ambient state.
//! - Environment overrides are applied field by field; blank values are ignored.

use crate::logging::default_log_level;
use crate::storage::StorageKeys;
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "PARADISE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PARADISE_LOG_DIR";
pub const ENV_DB_PATH: &str = "PARADISE_DB_PATH";
pub const ENV_KEY_NAMESPACE: &str = "PARADISE_KEY_NAMESPACE";

const DEFAULT_DB_FILE_NAME: &str = "paradise.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub db_path: PathBuf,
    /// Prefix applied to every persisted key.
    pub key_namespace: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            key_namespace: String::new(),
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by `PARADISE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(level) = value(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = value(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(namespace) = lookup(ENV_KEY_NAMESPACE) {
            config.key_namespace = namespace;
        }
        config
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::new(self.key_namespace.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_KEY_NAMESPACE, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn lookup_overrides_defaults_and_skips_blank_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_LOG_LEVEL, "warn"),
            (ENV_DB_PATH, "  "),
            (ENV_KEY_NAMESPACE, "procrastinator_"),
        ]);
        let config = CoreConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.log_level, "warn");
        assert_eq!(config.db_path, PathBuf::from("paradise.sqlite3"));
        assert_eq!(config.log_dir, None);
        assert_eq!(
            config.storage_keys().identity_list(),
            "procrastinator_identity_list"
        );
    }
}
