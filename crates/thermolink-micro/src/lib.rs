// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Thermolink Micro - Serial Link Core
//!
//! The `no_std` half of the thermolink temperature bridge. It runs on the
//! sensor node (AVR, ESP32) and is shared with the gateway, which decodes the
//! same line protocol on the other end of the wire.
//!
//! ## Design Constraints
//!
//! - **No heap allocations** (fixed line buffers)
//! - **`no_std` compatible**
//! - **Blocking I/O** through the [`Uart`] trait
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------+
//! |  SensorSource (DS18B20, sysfs, mock)    |
//! +-----------------------------------------+
//!           v
//! +-----------------------------------------+
//! |  SensorNode (acquire -> Sample)         |
//! +-----------------------------------------+
//!           v
//! +-----------------------------------------+
//! |  LineEncoder  "23.50\n" | "ERROR\n"     |
//! +-----------------------------------------+
//!           v   serial 8N1 @ 9600
//! +-----------------------------------------+
//! |  LineDecoder -> Decoded (gateway side)  |
//! +-----------------------------------------+
//! ```
//!
//! ## Feature Flags
//!
//! - `std` -- Enable std (host testing, gateway)
//! - `serial` -- `serialport` adapter for [`Uart`]

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error types for Thermolink Micro
pub mod error;

/// Temperature samples and the sensor source abstraction
pub mod sample;

/// Line framing (encode on the sensor node, decode on the gateway)
pub mod link;

/// UART abstraction and adapters
pub mod transport;

/// Sensor node acquisition cycle
pub mod node;

// Re-exports for convenience
pub use crate::error::{Error, Result};
pub use crate::link::{decode_line, Decoded, LineDecoder, LineEncoder, MalformedFrame};
pub use crate::node::SensorNode;
pub use crate::sample::{PlausibleRange, Sample, SensorSource, DEVICE_DISCONNECTED_C};
pub use crate::transport::Uart;

/// Line delimiter of the serial protocol
pub const LINE_DELIMITER: u8 = b'\n';

/// Capacity of the line buffer on the receiving side
pub const MAX_LINE_LEN: usize = 64;

/// Default serial baud rate shared by both ends (8N1)
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Version of Thermolink Micro
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
