// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host serial port adapter (requires `serial` feature)

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use super::Uart;
use crate::error::{Error, Result};

/// Default read timeout for blocking reads
const DEFAULT_TIMEOUT_MS: u64 = 100;

/// [`Uart`] over a host serial port (USB-UART bridge, `/dev/ttyUSB0`, `COM3`)
pub struct SerialUart {
    port: Box<dyn SerialPort>,
}

impl SerialUart {
    /// Open `path` at `baud_rate`, 8N1, no flow control
    pub fn open(path: &str, baud_rate: u32) -> serialport::Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .open()?;

        Ok(Self { port })
    }

    /// Port name as reported by the OS
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

fn map_read(result: io::Result<usize>) -> Result<usize> {
    match result {
        Ok(n) => Ok(n),
        Err(e) if e.kind() == io::ErrorKind::TimedOut => Err(Error::Timeout),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
        Err(_) => Err(Error::TransportError),
    }
}

fn map_pending(result: serialport::Result<u32>) -> Result<usize> {
    result
        .map(|n| n as usize)
        .map_err(|_| Error::TransportError)
}

impl Uart for SerialUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.port.write(data).map_err(|_| Error::TransportError)
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize> {
        self.port
            .set_timeout(Duration::from_millis(u64::from(timeout_ms)))
            .map_err(|_| Error::TransportError)?;
        map_read(self.port.read(buf))
    }

    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize> {
        // Fails once the adapter is unplugged
        let pending = map_pending(self.port.bytes_to_read())?;
        if pending == 0 {
            return Ok(0);
        }

        let want = pending.min(buf.len());
        match map_read(self.port.read(&mut buf[..want])) {
            // Bytes were announced, a timeout here just means they were consumed elsewhere
            Err(Error::Timeout) => Ok(0),
            other => other,
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.port.flush().map_err(|_| Error::TransportError)
    }

    fn available(&self) -> usize {
        map_pending(self.port.bytes_to_read()).unwrap_or(0)
    }
}
