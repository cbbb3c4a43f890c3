//! Shell configuration
//!
//! Read from `config.json` in the platform config directory (resolved through
//! `directories`), or from an explicit `--config` path. A missing default file
//! means defaults; a missing explicit file is an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use devcycle_core::{ClassGuid, EngineConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Application identifier for directory paths
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "devcycle";
const APP_NAME: &str = "devcycle";
const CONFIG_FILE: &str = "config.json";

/// Auto-detect cadence
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Pause after a manual enable/disable before the list is re-read
pub const DEFAULT_POST_CHANGE_DELAY_MS: u64 = 500;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub device_class: ClassGuid,
    pub poll_interval_ms: u64,
    pub post_change_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            device_class: ClassGuid::AUDIO,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            post_change_delay_ms: DEFAULT_POST_CHANGE_DELAY_MS,
        }
    }
}

impl AppConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn post_change_delay(&self) -> Duration {
        Duration::from_millis(self.post_change_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.engine.vendor.patterns.iter().all(|p| p.is_empty()) {
            return Err(ConfigError::Invalid(
                "engine.vendor.patterns needs at least one non-empty pattern".to_string(),
            ));
        }
        Ok(())
    }
}

/// Effective configuration and the file it came from, if any
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Load from `explicit`, else from the default location, else defaults
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = explicit {
        let config = read_file(path)?;
        return Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
        });
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = read_file(&path)?;
            Ok(LoadedConfig {
                config,
                source: Some(path),
            })
        }
        _ => {
            tracing::debug!("No config file, using defaults");
            Ok(LoadedConfig {
                config: AppConfig::default(),
                source: None,
            })
        }
    }
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}
