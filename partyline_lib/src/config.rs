//! Engine configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::aggregate::SortOrder;

/// Error types for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    TomlParse(String),
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runtime settings for the engine and the CLI that fronts it.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// SQLite data store path.
    pub db_path: Option<PathBuf>,
    /// Curated session table overriding both the store and the compiled-in table.
    pub sessions_file: Option<PathBuf>,
    pub default_sort: SortOrder,
    pub cache_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            sessions_file: None,
            default_sort: SortOrder::Descending,
            cache_enabled: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.cache_enabled);
        assert_eq!(config.default_sort, SortOrder::Descending);
    }

    #[test]
    fn test_full_config() {
        let config = EngineConfig::from_toml_str(
            r#"
db_path = "/var/lib/partyline/votes.db"
sessions_file = "sessions.yml"
default_sort = "asc"
cache_enabled = false
"#,
        )
        .unwrap();
        assert_eq!(
            config.db_path.as_deref(),
            Some(Path::new("/var/lib/partyline/votes.db"))
        );
        assert_eq!(config.sessions_file.as_deref(), Some(Path::new("sessions.yml")));
        assert_eq!(config.default_sort, SortOrder::Ascending);
        assert!(!config.cache_enabled);
    }

    #[test]
    fn test_bad_sort_rejected() {
        let err = EngineConfig::from_toml_str("default_sort = \"sideways\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load("/nonexistent/partyline.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
