// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Gateway error types.

use thiserror::Error;

/// Top-level gateway errors.
///
/// Only setup can fail this way; once the bridge loop runs, every failure is
/// logged and counted instead.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Serial port error: {0}")]
    Serial(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Wireless stack errors.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Association failed: {0}")]
    Begin(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_display() {
        let err = GatewayError::from(ConfigError::Invalid("bad url".into()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid configuration: bad url"
        );

        assert_eq!(TransportError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            LinkError::Begin("radio off".into()).to_string(),
            "Association failed: radio off"
        );
    }
}
