use querycanvas_core::DEFAULT_RELATIONSHIP_TYPE;
use querycanvas_query::{DEFAULT_QUERY_DEPTH, DEFAULT_RESULT_LIMIT};
use querycanvas_workspace::DEFAULT_WORKSPACE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub history_limit: usize,
    pub default_workspace_name: String,
    pub default_relationship_type: String,
    pub mock_query_delay_ms: u64,
    pub default_result_limit: u32,
    pub default_query_depth: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            history_limit: 50,
            default_workspace_name: DEFAULT_WORKSPACE_NAME.to_string(),
            default_relationship_type: DEFAULT_RELATIONSHIP_TYPE.to_string(),
            mock_query_delay_ms: 500,
            default_result_limit: DEFAULT_RESULT_LIMIT,
            default_query_depth: DEFAULT_QUERY_DEPTH,
        }
    }
}

impl AppSettings {
    /// `<config dir>/querycanvas/settings.json`, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("querycanvas").join("settings.json"))
    }

    /// Loads settings from `path`. A missing file yields defaults; a file that
    /// exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::warn!("Settings file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        tracing::info!("Settings loaded from {:?}", path);
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("history_limit", self.history_limit as u64),
            ("default_result_limit", u64::from(self.default_result_limit)),
            ("default_query_depth", u64::from(self.default_query_depth)),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if self.default_workspace_name.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "default_workspace_name",
                reason: "must not be blank".to_string(),
            });
        }
        Ok(())
    }

    pub fn mock_query_delay(&self) -> Duration {
        Duration::from_millis(self.mock_query_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.history_limit, 50);
        assert_eq!(settings.mock_query_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "history_limit": 10 }"#).unwrap();
        let settings = AppSettings::load(&path).unwrap();
        assert_eq!(settings.history_limit, 10);
        assert_eq!(settings.default_workspace_name, DEFAULT_WORKSPACE_NAME);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppSettings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_zero_history_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "history_limit": 0 }"#).unwrap();
        assert!(matches!(
            AppSettings::load(&path),
            Err(SettingsError::Invalid {
                field: "history_limit",
                ..
            })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            default_workspace_name: "Soruşturma".to_string(),
            mock_query_delay_ms: 10,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(AppSettings::load(&path).unwrap(), settings);
    }
}
