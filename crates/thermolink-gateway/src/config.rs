// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Gateway configuration.
//!
//! Static for the lifetime of the process: loaded once from a TOML file or
//! built from command-line flags.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thermolink_micro::{PlausibleRange, DEFAULT_BAUD_RATE};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Wireless network.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Remote HTTP endpoint.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Serial link to the sensor node.
    #[serde(default)]
    pub serial: SerialConfig,

    /// Bridge loop tuning.
    #[serde(default)]
    pub bridge: BridgeConfig,
}

/// Wireless network settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network name.
    #[serde(default)]
    pub ssid: String,

    /// Network passphrase.
    #[serde(default)]
    pub passphrase: String,

    /// Upper bound for one connect attempt (milliseconds).
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Status poll cadence while connecting (milliseconds).
    #[serde(default = "default_status_poll_ms")]
    pub status_poll_ms: u64,
}

/// Remote endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Report URL (POST).
    #[serde(default = "default_url")]
    pub url: String,

    /// JSON key carrying the reading.
    #[serde(default = "default_metric_field")]
    pub metric_field: String,

    /// Upper bound for one POST (milliseconds).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Serial link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial device path.
    #[serde(default = "default_serial_port")]
    pub port: String,

    /// Baud rate (8N1).
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Bridge loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Sleep between cycles (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Minimum spacing between dispatches (milliseconds, 0 to disable).
    #[serde(default)]
    pub min_dispatch_interval_ms: u64,

    /// Statistics logging interval (seconds, 0 to disable).
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,

    /// Lowest plausible reading.
    #[serde(default = "default_plausible_min")]
    pub plausible_min: f64,

    /// Highest plausible reading.
    #[serde(default = "default_plausible_max")]
    pub plausible_max: f64,
}

fn default_connect_timeout_ms() -> u64 {
    20_000
}

fn default_status_poll_ms() -> u64 {
    500
}

fn default_url() -> String {
    "http://192.168.137.1:3000/api/sensor-data".to_string()
}

fn default_metric_field() -> String {
    "temperature".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_serial_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_stats_interval() -> u64 {
    60
}

fn default_plausible_min() -> f64 {
    PlausibleRange::DEFAULT.min
}

fn default_plausible_max() -> f64 {
    PlausibleRange::DEFAULT.max
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            passphrase: String::new(),
            connect_timeout_ms: default_connect_timeout_ms(),
            status_poll_ms: default_status_poll_ms(),
        }
    }
}

impl NetworkConfig {
    /// Connect attempt timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Status poll cadence.
    pub fn status_poll(&self) -> Duration {
        Duration::from_millis(self.status_poll_ms)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            metric_field: default_metric_field(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl EndpointConfig {
    /// POST timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            min_dispatch_interval_ms: 0,
            stats_interval_secs: default_stats_interval(),
            plausible_min: default_plausible_min(),
            plausible_max: default_plausible_max(),
        }
    }
}

impl BridgeConfig {
    /// Sleep between cycles.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Minimum spacing between dispatches, if enabled.
    pub fn min_dispatch_interval(&self) -> Option<Duration> {
        (self.min_dispatch_interval_ms > 0)
            .then(|| Duration::from_millis(self.min_dispatch_interval_ms))
    }

    /// Statistics logging interval, if enabled.
    pub fn stats_interval(&self) -> Option<Duration> {
        (self.stats_interval_secs > 0).then(|| Duration::from_secs(self.stats_interval_secs))
    }

    /// Accepted reading interval.
    pub fn plausible_range(&self) -> PlausibleRange {
        PlausibleRange::new(self.plausible_min, self.plausible_max)
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration pointing at `url` with every other setting defaulted.
    pub fn for_endpoint(url: impl Into<String>) -> Self {
        Self {
            endpoint: EndpointConfig {
                url: url.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.endpoint.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "Endpoint URL must be http:// or https:// (got '{}')",
                url
            )));
        }

        if self.endpoint.metric_field.trim().is_empty() {
            return Err(ConfigError::Invalid("Metric field name is empty".into()));
        }

        if self.endpoint.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request_timeout_ms must be > 0".into()));
        }

        if self.network.connect_timeout_ms == 0 || self.network.status_poll_ms == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_ms and status_poll_ms must be > 0".into(),
            ));
        }

        if self.network.status_poll_ms > self.network.connect_timeout_ms {
            return Err(ConfigError::Invalid(format!(
                "status_poll_ms ({}) exceeds connect_timeout_ms ({})",
                self.network.status_poll_ms, self.network.connect_timeout_ms
            )));
        }

        if self.serial.baud_rate == 0 {
            return Err(ConfigError::Invalid("baud_rate must be > 0".into()));
        }

        if self.bridge.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be > 0".into()));
        }

        let range = self.bridge.plausible_range();
        if !(range.min.is_finite() && range.max.is_finite() && range.min < range.max) {
            return Err(ConfigError::Invalid(format!(
                "Plausible range [{}, {}] is empty",
                range.min, range.max
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint.metric_field, "temperature");
        assert_eq!(config.network.connect_timeout(), Duration::from_secs(20));
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.bridge.min_dispatch_interval(), None);
    }

    #[test]
    fn test_minimal_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            r#"
[endpoint]
url = "https://example.net/api/sensor-data"
metric_field = "batteryTemperature"
"#
        )
        .expect("write");

        let config = GatewayConfig::from_file(file.path()).expect("load");
        assert_eq!(config.endpoint.url, "https://example.net/api/sensor-data");
        assert_eq!(config.endpoint.metric_field, "batteryTemperature");
        assert_eq!(config.network.status_poll_ms, 500);
        assert_eq!(config.bridge.poll_interval_ms, 100);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[endpoint]\nurl = \"ftp://nope\"").expect("write");

        match GatewayConfig::from_file(file.path()) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("ftp://nope")),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[endpoint\nurl = ").expect("write");

        assert!(matches!(
            GatewayConfig::from_file(file.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = GatewayConfig::for_endpoint("http://127.0.0.1:3000/api");
        assert!(config.validate().is_ok());

        config.endpoint.metric_field = "  ".into();
        assert!(config.validate().is_err());
        config.endpoint.metric_field = "temperature".into();

        config.network.status_poll_ms = 30_000;
        assert!(config.validate().is_err());
        config.network.status_poll_ms = 500;

        config.bridge.plausible_min = 100.0;
        assert!(config.validate().is_err());
        config.bridge.plausible_min = -50.0;

        config.bridge.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = GatewayConfig::for_endpoint("http://10.0.0.2/api");
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        assert!(toml_str.contains("[endpoint]"));
        assert!(toml_str.contains("metric_field = \"temperature\""));

        let parsed: GatewayConfig = toml::from_str(&toml_str).expect("parse");
        assert_eq!(parsed.endpoint.url, "http://10.0.0.2/api");
    }
}
