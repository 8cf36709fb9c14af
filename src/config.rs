//! User configuration loaded from `config.toml`

use crate::error::ConfigError;
use crate::render::LayoutConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
}

impl Config {
    /// `<config dir>/machine-report/config.toml` for the current user.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "machine-report")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from the default location. A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_cli_overrides(&mut self, title: Option<String>, subtitle: Option<String>) {
        if let Some(title) = title {
            self.layout.title = title;
        }
        if let Some(subtitle) = subtitle {
            self.layout.subtitle = subtitle;
        }
    }
}
