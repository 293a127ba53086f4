// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for Thermolink Micro

use core::fmt;

/// Result type for Thermolink Micro operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for Thermolink Micro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Buffer too small for operation
    BufferTooSmall,

    /// Value cannot be rendered as a frame (NaN, infinity)
    InvalidData,

    /// UART or serial port error
    TransportError,

    /// Operation timed out
    Timeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BufferTooSmall => write!(f, "Buffer too small"),
            Error::InvalidData => write!(f, "Invalid sample value"),
            Error::TransportError => write!(f, "Transport error"),
            Error::Timeout => write!(f, "Operation timed out"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
