// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UART abstraction for the sensor link
//!
//! Platform implementations (AVR `Serial3`, ESP32 `UART2`, host serial port)
//! provide this trait. Both ends run 8N1 at
//! [`DEFAULT_BAUD_RATE`](crate::DEFAULT_BAUD_RATE) unless configured otherwise.
//!
//! ## Design Principles
//!
//! - **No heap allocations** - callers pass buffers
//! - **Blocking I/O** with an explicit non-blocking `try_read`
//! - **Error handling** - Result-based, no panics

use crate::error::Result;

#[cfg(feature = "serial")]
mod serial;

#[cfg(feature = "serial")]
pub use serial::SerialUart;

/// UART abstraction for the serial link
pub trait Uart {
    /// Write bytes to UART TX
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read bytes from UART RX (blocking with timeout)
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize>;

    /// Read bytes from UART RX (non-blocking)
    ///
    /// Returns `Ok(0)` when nothing is buffered.
    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Flush TX buffer
    fn flush(&mut self) -> Result<()>;

    /// Number of bytes waiting in the RX buffer
    fn available(&self) -> usize;
}

/// Null UART (for testing)
///
/// Accepts every write, never receives anything.
#[derive(Debug, Default)]
pub struct NullUart {
    written: usize,
}

impl NullUart {
    /// Create a new null UART
    pub const fn new() -> Self {
        Self { written: 0 }
    }

    /// Total bytes accepted so far
    pub const fn written(&self) -> usize {
        self.written
    }
}

impl Uart for NullUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.written += data.len();
        Ok(data.len())
    }

    fn read(&mut self, _buf: &mut [u8], _timeout_ms: u32) -> Result<usize> {
        Ok(0)
    }

    fn try_read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Ok(0)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn available(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_uart() {
        let mut uart = NullUart::new();

        assert_eq!(uart.write(b"23.50\n").unwrap(), 6);
        assert_eq!(uart.written(), 6);

        let mut buf = [0u8; 8];
        assert_eq!(uart.try_read(&mut buf).unwrap(), 0);
        assert_eq!(uart.available(), 0);
    }
}
