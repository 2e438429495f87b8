//! Process configuration — `pipsim.toml`, every field optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::viewport::ZoomLevel;

pub const CONFIG_FILE_NAME: &str = "pipsim.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("zoom must be 1-4, got {0}")]
    InvalidZoom(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Directory scanned for bar data files.
    pub data_dir: PathBuf,
    /// Directory holding config.txt, fade.txt, trend.txt, history.txt.
    pub settings_dir: PathBuf,
    /// Starting zoom level, 1-4.
    pub zoom: u8,
    /// Log file for the terminal UI, relative to `settings_dir`.
    pub log_file: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            settings_dir: PathBuf::from("settings"),
            zoom: ZoomLevel::default().number(),
            log_file: PathBuf::from("pipsim.log"),
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.zoom_level()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Resolve and load configuration.
    ///
    /// An explicit path must exist. Otherwise `./pipsim.toml` and then the
    /// user config directory are tried; with neither present the defaults
    /// apply. Returns the file actually used, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }
        for candidate in Self::search_paths() {
            if candidate.is_file() {
                return Ok((Self::from_file(&candidate)?, Some(candidate)));
            }
        }
        Ok((Self::default(), None))
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("pipsim").join(CONFIG_FILE_NAME));
        }
        paths
    }

    pub fn zoom_level(&self) -> Result<ZoomLevel, ConfigError> {
        ZoomLevel::from_number(self.zoom).ok_or(ConfigError::InvalidZoom(self.zoom))
    }

    pub fn log_path(&self) -> PathBuf {
        self.settings_dir.join(&self.log_file)
    }
}
