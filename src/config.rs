//! Configuration loading and constants.
//!
//! Loads the hosting service's configuration from a TOML file and defines
//! defaults for the health endpoint, logging and the listen address.
//! `AppConfig` is the root configuration struct containing all settings.

use const_format::formatcp;
use http::StatusCode;
use serde::Deserialize;
use std::path::Path;

use crate::health::{HealthConfig, Info};

// =============================================================================
// Health Endpoint Defaults
// =============================================================================

/// Route the responder answers on
pub const DEFAULT_HEALTH_PATH: &str = "/health";

/// Status label reported when diagnostics succeed
pub const DEFAULT_HEALTH_STATUS: &str = "ok";

/// HTTP status code reported when diagnostics succeed
pub const DEFAULT_HEALTH_STATUS_CODE: u16 = 200;

/// Environment variable that selects the deployment mode
pub const PRODUCTION_ENV_VAR: &str = "APP_ENV";

/// Value of `PRODUCTION_ENV_VAR` that hides error detail
pub const PRODUCTION_ENV_VALUE: &str = "production";

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Health responses must never be served from a cache
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

/// Service banner - changes only on deploy
pub const HTTP_CACHE_BANNER_MAX_AGE: u32 = 60;

pub const CACHE_CONTROL_BANNER: &str =
    formatcp!("public, max-age={}", HTTP_CACHE_BANNER_MAX_AGE);

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/heartbeat.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "heartbeat=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Default listen address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Health endpoint configuration
    #[serde(default)]
    pub health: HealthSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// File form of the health endpoint settings.
///
/// Only static `info` can be expressed in a file; dynamic producers are
/// attached in code by setting [`HealthConfig::info`].
#[derive(Debug, Clone, Deserialize)]
pub struct HealthSettings {
    #[serde(default = "HealthSettings::default_path")]
    pub path: String,
    #[serde(default = "HealthSettings::default_status")]
    pub status: String,
    #[serde(default = "HealthSettings::default_status_code")]
    pub status_code: u16,
    #[serde(default)]
    pub include_env: bool,
    #[serde(default)]
    pub env_keys: Vec<String>,
    /// Extra fields merged into every health payload
    #[serde(default)]
    pub info: serde_json::Map<String, serde_json::Value>,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            status: Self::default_status(),
            status_code: Self::default_status_code(),
            include_env: false,
            env_keys: Vec::new(),
            info: serde_json::Map::new(),
        }
    }
}

impl HealthSettings {
    fn default_path() -> String {
        DEFAULT_HEALTH_PATH.to_string()
    }

    fn default_status() -> String {
        DEFAULT_HEALTH_STATUS.to_string()
    }

    fn default_status_code() -> u16 {
        DEFAULT_HEALTH_STATUS_CODE
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "health.path must start with '/', got {:?}",
                self.path
            )));
        }
        self.parsed_status_code()?;
        Ok(())
    }

    fn parsed_status_code(&self) -> Result<StatusCode, ConfigError> {
        StatusCode::from_u16(self.status_code).map_err(|_| {
            ConfigError::Validation(format!(
                "health.status_code {} is not a valid HTTP status",
                self.status_code
            ))
        })
    }

    /// Convert into the responder's configuration.
    pub fn into_health_config(self) -> Result<HealthConfig, ConfigError> {
        self.validate()?;
        let status_code = self.parsed_status_code()?;

        Ok(HealthConfig {
            path: self.path,
            info: Info::Static(self.info),
            status: self.status,
            status_code,
            include_env: self.include_env,
            env_keys: self.env_keys,
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    /// Whether structured JSON output was requested
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;

        config.health.validate()?;

        if !matches!(config.logging.format.to_ascii_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got {:?}",
                config.logging.format
            )));
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
