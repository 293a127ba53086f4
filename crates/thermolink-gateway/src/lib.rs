// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Thermolink Gateway
//!
//! Second hop of the thermolink bridge: reads temperature frames from the
//! sensor node over a serial line and forwards each accepted reading as a
//! JSON report to an HTTP endpoint over a wireless link.
//!
//! # Features
//!
//! - **Line decoding**: `23.50` / `ERROR` frames, malformed lines dropped
//! - **Connectivity**: bounded connect attempts, reconnect on link loss
//! - **Dispatch**: one POST per reading, no inline retry, no queue
//! - **Statistics**: atomic counters, periodic summary in the log
//!
//! # Quick Start
//!
//! ```bash
//! # Serial node on /dev/ttyUSB0, default endpoint
//! thermolink-gateway --port /dev/ttyUSB0
//!
//! # Frames from stdin, custom endpoint and field
//! thermolink-node --simulate --port - | \
//!     thermolink-gateway --stdin --url http://127.0.0.1:3000/api/sensor-data --field batteryTemperature
//!
//! # Using config file
//! thermolink-gateway --config gateway.toml
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! [network]
//! ssid = "SS2"
//! passphrase = "00000000"
//!
//! [endpoint]
//! url = "http://192.168.137.1:3000/api/sensor-data"
//! metric_field = "temperature"
//!
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud_rate = 9600
//! ```

pub mod adapters;
pub mod bridge;
pub mod clock;
pub mod config;
pub mod connectivity;
pub mod dispatch;
pub mod error;
pub mod stats;

pub use bridge::{BridgeLoop, FrameDisposition};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GatewayConfig};
pub use connectivity::{ConnectionState, ConnectivityManager, LinkStatus, WirelessLink};
pub use dispatch::{DeliveryOutcome, HttpResponse, HttpTransport, Report, ReportDispatcher};
pub use error::{GatewayError, LinkError, TransportError};
pub use stats::{GatewayStats, StatsSnapshot};
