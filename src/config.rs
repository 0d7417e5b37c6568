//! Configuration management for LectureTUI
//!
//! Config is stored at ~/.config/lecturetui/config.toml
//!
//! ```toml
//! base_url = "http://127.0.0.1:5000"
//! debounce_ms = 300
//! player = "mpv"
//!
//! [[filters.topics]]
//! id = "1"
//! name = "Openings"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::api::catalog::DEFAULT_BASE_URL;
use crate::models::FilterCatalog;
use crate::search::debounce::DEFAULT_QUIET_PERIOD;
use crate::stream::player::PlayerType;

/// Environment override for the catalog base URL
pub const BASE_URL_ENV: &str = "LECTURETUI_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config path")]
    NoPath,
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to write config: {0}")]
    Write(#[from] std::io::Error),
    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog server root
    pub base_url: String,
    /// Quiet period before a typed search fires
    pub debounce_ms: u64,
    pub player: PlayerType,
    /// Option lists for the filter panel and label lookup
    pub filters: FilterCatalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            debounce_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
            player: PlayerType::default(),
            filters: FilterCatalog::default(),
        }
    }
}

impl Config {
    /// Get config file path (~/.config/lecturetui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lecturetui").join("config.toml"))
    }

    /// Load the default config file, or defaults if there is none.
    /// A file that exists but does not parse is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load an explicit config file (`--config`)
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().ok_or(ConfigError::NoPath)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Resolve the base URL with fallback chain:
    /// 1. `--base-url` flag
    /// 2. Environment variable `LECTURETUI_BASE_URL`
    /// 3. Config file / default
    pub fn apply_overrides(&mut self, base_url_flag: Option<&str>) {
        let env = std::env::var(BASE_URL_ENV).ok();
        if let Some(url) = pick_base_url(base_url_flag, env.as_deref()) {
            self.base_url = url;
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn pick_base_url(flag: Option<&str>, env: Option<&str>) -> Option<String> {
    flag.or(env)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterKind;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("lecturetui-config-{}", uuid::Uuid::new_v4()))
            .join("config.toml")
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.player, PlayerType::Mpv);
        assert!(config.filters.topics.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            player = "vlc"

            [[filters.topics]]
            id = "3"
            name = "Endgames"
            "#,
        )
        .unwrap();
        assert_eq!(config.player, PlayerType::Vlc);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.filters.by_label(FilterKind::Topic, "endgames").map(|o| o.id.as_str()),
            Some("3")
        );
    }

    #[test]
    fn test_save_and_load_from() {
        let path = temp_path();
        let mut config = Config::default();
        config.debounce_ms = 150;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_reports_bad_toml() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "debounce_ms = \"soon\"").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        assert!(matches!(
            Config::load_from(&temp_path()),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_base_url_precedence() {
        assert_eq!(
            pick_base_url(Some("http://flag"), Some("http://env")),
            Some("http://flag".to_string())
        );
        assert_eq!(
            pick_base_url(None, Some("http://env")),
            Some("http://env".to_string())
        );
        assert_eq!(pick_base_url(None, Some("  ")), None);
        assert_eq!(pick_base_url(None, None), None);
    }
}
