use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use studynotes_engine::ServiceSettings;

pub(crate) const CONFIG_FILENAME: &str = "studynotes.ron";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Client settings, read from an optional RON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Origin of the study-notes service.
    pub origin: String,
    pub download_dir: PathBuf,
    pub log_level: String,
    pub log_to_file: bool,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_download_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let service = ServiceSettings::default();
        Self {
            origin: service.origin,
            download_dir: service.download_dir,
            log_level: "info".to_string(),
            log_to_file: true,
            connect_timeout_secs: service.connect_timeout.as_secs(),
            request_timeout_secs: service.request_timeout.as_secs(),
            max_download_bytes: service.max_download_bytes,
        }
    }
}

impl AppConfig {
    pub(crate) fn level(&self) -> Option<LevelFilter> {
        notes_logging::parse_level(&self.log_level)
    }

    pub(crate) fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            origin: self.origin.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_download_bytes: self.max_download_bytes,
            download_dir: self.download_dir.clone(),
        }
    }
}

/// Loads the config file. A missing file yields the defaults.
pub(crate) fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(&temp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.level(), Some(LevelFilter::Info));
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(origin: "http://notes.local:8080", request_timeout_secs: 30)"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.origin, "http://notes.local:8080");
        let settings = config.service_settings();
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(origin: ").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }
}
