//! Configuration module for the notice board core.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{BoardError, Result};

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Service name shown in notification subjects.
    #[serde(default = "default_service_name")]
    pub name: String,
    /// Locale used when a domain has no language setting.
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

fn default_service_name() -> String {
    "Notice Board".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            default_locale: default_locale(),
        }
    }
}

/// Notification pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Send-guard retry interval in seconds. A (post, domain) pair cannot
    /// be re-sent until this interval elapses.
    #[serde(default = "default_retry_interval")]
    pub retry_interval_secs: u64,
    /// TTL in seconds for cached per-domain settings lookups.
    #[serde(default = "default_settings_cache_ttl")]
    pub settings_cache_ttl_secs: u64,
    /// Maximum concurrent directory/config sub-queries during the gather
    /// phase.
    #[serde(default = "default_gather_concurrency")]
    pub gather_concurrency: usize,
    /// Maximum concurrent mail sends during the fan-out phase.
    #[serde(default = "default_fanout_concurrency")]
    pub fanout_concurrency: usize,
}

fn default_retry_interval() -> u64 {
    180
}

fn default_settings_cache_ttl() -> u64 {
    300
}

fn default_gather_concurrency() -> usize {
    8
}

fn default_fanout_concurrency() -> usize {
    16
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            retry_interval_secs: default_retry_interval(),
            settings_cache_ttl_secs: default_settings_cache_ttl(),
            gather_concurrency: default_gather_concurrency(),
            fanout_concurrency: default_fanout_concurrency(),
        }
    }
}

impl NotificationConfig {
    /// Send-guard retry interval as a `Duration`.
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    /// Settings cache TTL as a `Duration`.
    pub fn settings_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.settings_cache_ttl_secs)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/bulletin.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Service identity settings.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Notification pipeline settings.
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| BoardError::Config(e.to_string()))
    }
}
