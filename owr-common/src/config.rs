//! Configuration loading
//!
//! Resolution order, highest priority first:
//! 1. Command-line overrides (`--config`, `--database`, `--port`, with env fallbacks)
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! The resolved [`MonitorConfig`] is built once at startup and handed to each
//! component. Nothing reads configuration from global state.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_OLLAMA_SERVER_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
pub const DEFAULT_DEVICE_MODEL: &str = "LaCrosse-TX141W";
pub const DEFAULT_RECOMMENDATION_INTERVAL_MINUTES: u64 = 15;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 6656;
pub const DEFAULT_FEED_COMMAND: &str = "/usr/bin/rtl_433";

/// Decoder arguments: 433 MHz, JSON lines, UTC ISO timestamps
pub const DEFAULT_FEED_ARGS: [&str; 6] = ["-f", "433000000", "-F", "json", "-M", "time:iso:utc:tz"];

/// Configuration file contents
///
/// Every key is optional; missing keys take compiled defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub ollama_server_url: String,
    pub ollama_model: String,
    pub indoor_device_model: String,
    pub outdoor_device_model: String,
    pub recommendation_interval_minutes: u64,
    pub llm_timeout_secs: u64,
    pub database_path: Option<PathBuf>,
    pub bind_address: String,
    pub port: u16,
    pub static_assets: PathBuf,
    pub feed: FeedConfig,
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            ollama_server_url: DEFAULT_OLLAMA_SERVER_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            indoor_device_model: DEFAULT_DEVICE_MODEL.to_string(),
            outdoor_device_model: DEFAULT_DEVICE_MODEL.to_string(),
            recommendation_interval_minutes: DEFAULT_RECOMMENDATION_INTERVAL_MINUTES,
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            database_path: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            static_assets: PathBuf::from("./ui/dist/ui"),
            feed: FeedConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// External decoder process settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub command: PathBuf,
    pub args: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from(DEFAULT_FEED_COMMAND),
            args: DEFAULT_FEED_ARGS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Values supplied on the command line or through environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub port: Option<u16>,
}

/// Language-model endpoint settings
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub server_url: String,
    pub model: String,
    pub timeout: Duration,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub llm: LlmConfig,
    pub indoor_device_model: String,
    pub outdoor_device_model: String,
    pub recommendation_interval: Duration,
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub static_assets: PathBuf,
    pub feed: FeedConfig,
    pub logging: LoggingConfig,
}

impl MonitorConfig {
    /// Resolve configuration from overrides, config file and defaults
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let toml_config = match &overrides.config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                read_toml_config(path)?
            }
            None => match default_config_file() {
                Some(path) => read_toml_config(&path)?,
                None => {
                    warn!("No config file found, using built-in defaults");
                    TomlConfig::default()
                }
            },
        };

        Self::from_toml(toml_config, overrides)
    }

    /// Apply overrides to parsed file contents and validate the result
    pub fn from_toml(toml_config: TomlConfig, overrides: &ConfigOverrides) -> Result<Self> {
        if toml_config.recommendation_interval_minutes == 0 {
            return Err(Error::Config(
                "recommendation_interval_minutes must be at least 1".to_string(),
            ));
        }
        let interval_secs = toml_config
            .recommendation_interval_minutes
            .checked_mul(60)
            .ok_or_else(|| {
                Error::Config("recommendation_interval_minutes is too large".to_string())
            })?;
        if toml_config.llm_timeout_secs == 0 {
            return Err(Error::Config("llm_timeout_secs must be at least 1".to_string()));
        }
        if toml_config.ollama_server_url.trim().is_empty() {
            return Err(Error::Config("ollama_server_url cannot be empty".to_string()));
        }
        if toml_config.ollama_model.trim().is_empty() {
            return Err(Error::Config("ollama_model cannot be empty".to_string()));
        }

        let database_path = overrides
            .database_path
            .clone()
            .or(toml_config.database_path)
            .unwrap_or_else(default_database_path);

        Ok(Self {
            llm: LlmConfig {
                server_url: toml_config.ollama_server_url,
                model: toml_config.ollama_model,
                timeout: Duration::from_secs(toml_config.llm_timeout_secs),
            },
            indoor_device_model: toml_config.indoor_device_model,
            outdoor_device_model: toml_config.outdoor_device_model,
            recommendation_interval: Duration::from_secs(interval_secs),
            database_path,
            bind_address: toml_config.bind_address,
            port: overrides.port.unwrap_or(toml_config.port),
            static_assets: toml_config.static_assets,
            feed: toml_config.feed,
            logging: toml_config.logging,
        })
    }

    /// Socket address string for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// First existing config file: user config dir, then system-wide
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("owr").join("config.toml"));
    let system_config = PathBuf::from("/etc/owr/config.toml");

    user_config
        .into_iter()
        .chain(std::iter::once(system_config))
        .find(|path| path.exists())
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("owr"))
        .unwrap_or_else(|| PathBuf::from("./owr_data"))
        .join("weather.db")
}
