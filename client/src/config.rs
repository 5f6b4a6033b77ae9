//! Client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use verdict_api::{HttpTransport, TransportError};
use verdict_utils::LogFormat;

use crate::error::ConfigError;

/// Configuration for a Verdict client session.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the poll service.
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Whole-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// TCP connect timeout, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Most options a new poll may carry.
    #[serde(default = "default_max_options")]
    pub max_options: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Address the development wallet connects with.
    #[serde(default)]
    pub wallet_address: Option<String>,

    /// Simulated approval delay of the development wallet, in milliseconds.
    #[serde(default = "default_wallet_delay_ms")]
    pub wallet_delay_ms: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_service_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_options() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_wallet_delay_ms() -> u64 {
    1000
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_options < 2 {
            return Err(ConfigError::Parse(format!(
                "max_options must be at least 2, got {}",
                self.max_options
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Parse("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn wallet_delay(&self) -> Duration {
        Duration::from_millis(self.wallet_delay_ms)
    }

    /// Build the HTTP transport this configuration describes.
    pub fn http_transport(&self) -> Result<HttpTransport, TransportError> {
        HttpTransport::with_timeouts(
            self.service_url.clone(),
            self.request_timeout(),
            self.connect_timeout(),
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_options: default_max_options(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            wallet_address: None,
            wallet_delay_ms: default_wallet_delay_ms(),
        }
    }
}
