//! Configuration management for poolstat

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("poolstat")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Top-level config file wrapper (handles the `[monitor]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Settings for the polling monitor.
///
/// Every field can be overridden on the command line; the file only
/// supplies defaults for flags the user left unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Registry host; may embed a port as "host:port"
    pub host: String,
    /// Registry port (optional when the host embeds one)
    pub port: Option<u16>,
    /// Number of reports to emit; 0 means run until interrupted
    pub rowcount: u64,
    /// Seconds to wait between polls
    pub interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: None,
            rowcount: 0,
            interval_secs: 1,
        }
    }
}

impl MonitorConfig {
    /// Delay between poll iterations
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Resolve the registry address, or `None` if no port is available.
    ///
    /// An explicit port wins; otherwise the host must already carry one.
    pub fn registry_address(&self) -> Option<String> {
        match self.port {
            Some(port) => Some(format!("{}:{}", self.host, port)),
            None if self.host.contains(':') => Some(self.host.clone()),
            None => None,
        }
    }
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to a file
pub fn save_config<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::Invalid(format!("Failed to create config dir: {}", e)))?;
    }

    std::fs::write(path, content)
        .map_err(|e| ConfigError::Invalid(format!("Failed to write config: {}", e)))?;

    Ok(())
}
