use crate::error::ConfigError;
use crate::state::GlobalState;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Startup configuration for a [`Store`](crate::Store).
///
/// ```toml
/// log_changes = true
///
/// [initial_state]
/// count = 0
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// The state the store starts from.
    pub initial_state: GlobalState,
    /// Emit a `debug` event for every change.
    pub log_changes: bool,
}

impl StoreConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse { source })
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), keys = config.initial_state.len(), "loaded store config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn parses_initial_state() {
        let config = StoreConfig::from_toml_str(
            r#"
            log_changes = true

            [initial_state]
            count = 0
            title = "demo"
            "#,
        )
        .unwrap();

        assert!(config.log_changes);
        assert_eq!(config.initial_state.get("count"), Some(&json!(0)));
        assert_eq!(config.initial_state.get("title"), Some(&json!("demo")));
    }

    #[test]
    fn empty_config_is_default() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert!(!config.log_changes);
        assert!(config.initial_state.is_empty());
    }

    #[test]
    fn non_table_state_is_rejected() {
        let err = StoreConfig::from_toml_str("initial_state = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[initial_state]\ncount = 7").unwrap();

        let config = StoreConfig::load(file.path()).unwrap();
        assert_eq!(config.initial_state.get("count"), Some(&json!(7)));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
