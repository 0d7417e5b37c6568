//! Persistent theme preference
//!
//! The explicit light/dark choice lives under the `theme` key of
//! `~/.config/lecturetui/state.toml`. No key means "follow the OS".

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::models::ThemeMode;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No config directory available")]
    NoPath,
    #[error("Failed to write state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode state file: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Where the explicit theme choice is kept
pub trait PreferenceStore {
    fn load_theme(&self) -> Option<ThemeMode>;
    fn save_theme(&mut self, mode: ThemeMode) -> Result<(), StoreError>;
    fn clear_theme(&mut self) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<ThemeMode>,
}

/// TOML-backed store
#[derive(Debug, Clone)]
pub struct StateFile {
    path: Option<PathBuf>,
}

impl StateFile {
    /// Default location (~/.config/lecturetui/state.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lecturetui").join("state.toml"))
    }

    /// Store at the default location. Without a config directory every
    /// save fails and every load returns `None`.
    pub fn open() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read(&self) -> StateDoc {
        self.path
            .as_ref()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| match toml::from_str(&s) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(error = %e, "state: ignoring unreadable state file");
                    None
                }
            })
            .unwrap_or_default()
    }

    fn write(&self, doc: &StateDoc) -> Result<(), StoreError> {
        let path = self.path.as_ref().ok_or(StoreError::NoPath)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(doc)?)?;
        Ok(())
    }
}

impl PreferenceStore for StateFile {
    fn load_theme(&self) -> Option<ThemeMode> {
        self.read().theme
    }

    fn save_theme(&mut self, mode: ThemeMode) -> Result<(), StoreError> {
        let mut doc = self.read();
        doc.theme = Some(mode);
        self.write(&doc)
    }

    fn clear_theme(&mut self) -> Result<(), StoreError> {
        let mut doc = self.read();
        doc.theme = None;
        self.write(&doc)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    theme: Option<ThemeMode>,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn with_theme(mode: ThemeMode) -> Self {
        Self {
            theme: Some(mode),
            saves: 0,
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load_theme(&self) -> Option<ThemeMode> {
        self.theme
    }

    fn save_theme(&mut self, mode: ThemeMode) -> Result<(), StoreError> {
        self.theme = Some(mode);
        self.saves += 1;
        Ok(())
    }

    fn clear_theme(&mut self) -> Result<(), StoreError> {
        self.theme = None;
        Ok(())
    }
}
