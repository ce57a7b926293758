//! Config file handling

use crate::errors::{Result, SubprocError};
use std::path::PathBuf;
use std::time::Duration;

/// Defaults the CLI falls back to when flags are not given
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub restart: bool,
    pub max_restarts: Option<u32>,
    pub restart_delay: Option<Duration>,
}

impl Config {
    /// Load configuration from `<config_dir>/subproc/config.toml`
    ///
    /// A missing file means built-in defaults; a malformed file is an
    /// error.
    pub fn load() -> Result<Self> {
        match Self::config_file() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    SubprocError::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::parse(&content)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("subproc").join("config.toml"))
    }

    fn parse(content: &str) -> Result<Self> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| SubprocError::Config(format!("Invalid config TOML: {}", e)))?;

        let defaults = toml_value.get("defaults");

        let restart = defaults
            .and_then(|d| d.get("restart"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let max_restarts = defaults
            .and_then(|d| d.get("max_restarts"))
            .and_then(|v| v.as_integer())
            .and_then(|n| u32::try_from(n).ok());

        let restart_delay = match defaults
            .and_then(|d| d.get("restart_delay"))
            .and_then(|v| v.as_str())
        {
            Some(raw) => Some(humantime::parse_duration(raw).map_err(|e| {
                SubprocError::Config(format!("Invalid restart_delay {:?}: {}", raw, e))
            })?),
            None => None,
        };

        Ok(Self {
            restart,
            max_restarts,
            restart_delay,
        })
    }
}
