// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wireless link backed by the host's network configuration.
//!
//! On a host the OS owns association, so `begin` only records the target
//! network and the link counts as up while a non-loopback address exists.

use std::net::IpAddr;

use crate::connectivity::{LinkStatus, WirelessLink};
use crate::error::LinkError;

/// Host network status as a [`WirelessLink`].
#[derive(Debug, Default)]
pub struct HostLink {
    ssid: Option<String>,
    address: Option<IpAddr>,
}

impl HostLink {
    /// Create a link that has not been started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Network name passed to the last `begin`.
    pub fn ssid(&self) -> Option<&str> {
        self.ssid.as_deref()
    }
}

impl WirelessLink for HostLink {
    fn begin(&mut self, ssid: &str, _passphrase: &str) -> Result<(), LinkError> {
        if !ssid.is_empty() {
            tracing::debug!("Host manages association; target network '{}'", ssid);
        }
        self.ssid = Some(ssid.to_string());
        Ok(())
    }

    fn status(&mut self) -> LinkStatus {
        match local_ip_address::local_ip() {
            Ok(ip) if !ip.is_loopback() && !ip.is_unspecified() => {
                self.address = Some(ip);
                LinkStatus::Up
            }
            Ok(_) => {
                self.address = None;
                LinkStatus::Down
            }
            Err(e) => {
                tracing::debug!("No usable local address: {}", e);
                self.address = None;
                LinkStatus::Down
            }
        }
    }

    fn disconnect(&mut self) {
        self.address = None;
    }

    fn local_address(&self) -> Option<IpAddr> {
        self.address
    }
}
