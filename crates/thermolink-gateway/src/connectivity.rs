// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wireless connectivity state machine.
//!
//! ```text
//!                 connect()
//!   DISCONNECTED ----------> CONNECTING
//!        ^   ^                  |   |
//!        |   |   timeout        |   | status Up
//!        |   +------------------+   v
//!        |        link lost      CONNECTED
//!        +-------------------------+
//! ```
//!
//! `Disconnected` is never terminal; the next [`ConnectivityManager::ensure_connected`]
//! starts a fresh attempt. A connect attempt never outlives its timeout.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::config::NetworkConfig;
use crate::error::LinkError;
use crate::stats::GatewayStats;

/// Wireless link lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No association; the next health check starts an attempt.
    Disconnected,
    /// Association in progress, bounded by the connect timeout.
    Connecting,
    /// Link is up and usable.
    Connected,
}

impl ConnectionState {
    /// Reports may only be sent while connected.
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "DISCONNECTED"),
            Self::Connecting => write!(f, "CONNECTING"),
            Self::Connected => write!(f, "CONNECTED"),
        }
    }
}

/// What the wireless stack reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Associated with an address.
    Up,
    /// Not associated.
    Down,
}

/// Wireless stack primitives.
///
/// Implemented by the platform (ESP-IDF station, host network, test double).
pub trait WirelessLink {
    /// Start associating with a network. Must not block until association.
    fn begin(&mut self, ssid: &str, passphrase: &str) -> Result<(), LinkError>;

    /// Current link status. Must return promptly.
    fn status(&mut self) -> LinkStatus;

    /// Drop the association.
    fn disconnect(&mut self);

    /// Address assigned to the link, if known.
    fn local_address(&self) -> Option<IpAddr> {
        None
    }
}

/// Owns the [`ConnectionState`] and drives the wireless link.
pub struct ConnectivityManager<L: WirelessLink, C: Clock> {
    link: L,
    clock: C,
    config: NetworkConfig,
    state: ConnectionState,
    /// Clock reading when the current attempt started.
    attempt_started: Option<Duration>,
    /// Last `begin` failed; repeats are logged at debug level.
    begin_failing: bool,
    stats: Arc<GatewayStats>,
}

impl<L: WirelessLink, C: Clock> ConnectivityManager<L, C> {
    /// Create a manager in the `Disconnected` state.
    pub fn new(link: L, clock: C, config: NetworkConfig, stats: Arc<GatewayStats>) -> Self {
        Self {
            link,
            clock,
            config,
            state: ConnectionState::Disconnected,
            attempt_started: None,
            begin_failing: false,
            stats,
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True only while `Connected`.
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Clock shared with the bridge loop.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Underlying link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Start a connect attempt.
    ///
    /// No-op unless `Disconnected`.
    pub fn connect(&mut self) {
        if self.state != ConnectionState::Disconnected {
            return;
        }

        self.stats.record_connect_attempt();
        if !self.begin_failing {
            tracing::info!("Connecting to network '{}'", self.config.ssid);
        }

        match self.link.begin(&self.config.ssid, &self.config.passphrase) {
            Ok(()) => {
                self.state = ConnectionState::Connecting;
                self.attempt_started = Some(self.clock.now());
                self.begin_failing = false;
            }
            Err(e) if self.begin_failing => {
                tracing::debug!("{}; still retrying", e);
            }
            Err(e) => {
                tracing::warn!("{}; will retry", e);
                self.begin_failing = true;
            }
        }
    }

    /// Run one status check and apply the resulting transition.
    pub fn poll(&mut self) -> ConnectionState {
        match self.state {
            ConnectionState::Disconnected => {}

            ConnectionState::Connecting => {
                if self.link.status() == LinkStatus::Up {
                    self.state = ConnectionState::Connected;
                    self.attempt_started = None;
                    match self.link.local_address() {
                        Some(addr) => tracing::info!("Network connected, address {}", addr),
                        None => tracing::info!("Network connected"),
                    }
                } else if self.attempt_elapsed() >= self.config.connect_timeout() {
                    self.state = ConnectionState::Disconnected;
                    self.attempt_started = None;
                    self.link.disconnect();
                    self.stats.record_connect_timeout();
                    tracing::warn!(
                        "Network connection failed after {} ms; will retry",
                        self.config.connect_timeout_ms
                    );
                }
            }

            ConnectionState::Connected => {
                if self.link.status() == LinkStatus::Down {
                    self.state = ConnectionState::Disconnected;
                    self.stats.record_link_loss();
                    tracing::warn!("Network link lost");
                }
            }
        }

        self.state
    }

    /// Make sure the link is usable, or a bounded attempt was made.
    ///
    /// - `Connected`: health check only.
    /// - `Connecting`: keep waiting against the initial deadline.
    /// - `Disconnected`: start a fresh attempt and wait for it. If the link
    ///   refuses to start, wait one status poll before giving up the cycle.
    pub fn ensure_connected(&mut self) -> ConnectionState {
        match self.state {
            ConnectionState::Connected => self.poll(),
            ConnectionState::Connecting => self.wait_for_link(),
            ConnectionState::Disconnected => {
                self.connect();
                if self.state == ConnectionState::Disconnected {
                    self.clock.sleep(self.config.status_poll());
                    return self.state;
                }
                self.wait_for_link()
            }
        }
    }

    /// Drop the link on request.
    pub fn disconnect(&mut self) {
        if self.state != ConnectionState::Disconnected {
            tracing::info!("Disconnecting from network '{}'", self.config.ssid);
        }
        self.link.disconnect();
        self.state = ConnectionState::Disconnected;
        self.attempt_started = None;
    }

    /// Poll at the configured cadence until the attempt resolves.
    fn wait_for_link(&mut self) -> ConnectionState {
        let timeout = self.config.connect_timeout();
        let cadence = self.config.status_poll();

        loop {
            let state = self.poll();
            if state != ConnectionState::Connecting {
                return state;
            }

            // Never sleep past the deadline
            let remaining = timeout.saturating_sub(self.attempt_elapsed());
            self.clock.sleep(cadence.min(remaining));
        }
    }

    fn attempt_elapsed(&self) -> Duration {
        self.attempt_started
            .map(|started| self.clock.now().saturating_sub(started))
            .unwrap_or_default()
    }
}
