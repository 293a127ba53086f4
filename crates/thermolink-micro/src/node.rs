// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sensor node acquisition cycle
//!
//! One cycle = one reading = one frame on the wire. The caller owns the
//! pacing (the reference deployment reads every 2 seconds).

use crate::error::{Error, Result};
use crate::link::LineEncoder;
use crate::sample::{PlausibleRange, Sample, SensorSource};
use crate::transport::Uart;

/// Largest frame the node ever emits ("-50.00\n" or "ERROR\n" and margin)
const FRAME_BUF_SIZE: usize = 32;

/// Default acquisition interval in milliseconds
pub const DEFAULT_READ_INTERVAL_MS: u32 = 2000;

/// Sensor node: reads the probe and writes frames to the UART
pub struct SensorNode<S: SensorSource, U: Uart> {
    /// Temperature probe
    sensor: S,

    /// Link to the gateway
    uart: U,

    /// Frame encoder
    encoder: LineEncoder,

    /// Values outside this interval are sent as `ERROR`
    range: PlausibleRange,

    /// Frames written so far
    frames_sent: u32,
}

impl<S: SensorSource, U: Uart> SensorNode<S, U> {
    /// Create a new sensor node with the default plausible range
    pub fn new(sensor: S, uart: U) -> Self {
        Self::with_range(sensor, uart, PlausibleRange::DEFAULT)
    }

    /// Create with a custom plausible range
    pub fn with_range(sensor: S, uart: U, range: PlausibleRange) -> Self {
        Self {
            sensor,
            uart,
            encoder: LineEncoder::new(),
            range,
            frames_sent: 0,
        }
    }

    /// Run one acquisition cycle
    ///
    /// # Returns
    ///
    /// The sample that was framed and sent
    pub fn cycle(&mut self) -> Result<Sample> {
        let sample = Sample::from_celsius(self.sensor.read_celsius(), &self.range);

        let mut frame = [0u8; FRAME_BUF_SIZE];
        let len = self.encoder.encode(&sample, &mut frame)?;

        let sent = self.uart.write(&frame[..len])?;
        self.uart.flush()?;

        if sent != len {
            return Err(Error::TransportError);
        }

        self.frames_sent = self.frames_sent.wrapping_add(1);
        Ok(sample)
    }

    /// Frames written so far
    pub const fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    /// Split into sensor and UART
    pub fn into_parts(self) -> (S, U) {
        (self.sensor, self.uart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{Decoded, LineDecoder};
    use crate::sample::{PlausibleRange, DEVICE_DISCONNECTED_C};
    use crate::transport::NullUart;

    /// Probe replaying fixed readings
    struct ScriptedProbe {
        readings: [f64; 4],
        pos: usize,
    }

    impl SensorSource for ScriptedProbe {
        fn read_celsius(&mut self) -> f64 {
            let value = self.readings[self.pos % self.readings.len()];
            self.pos += 1;
            value
        }
    }

    /// Mock UART capturing TX
    struct MockUart {
        tx_buf: [u8; 128],
        tx_len: usize,
        short_write: bool,
    }

    impl MockUart {
        fn new() -> Self {
            Self {
                tx_buf: [0u8; 128],
                tx_len: 0,
                short_write: false,
            }
        }
    }

    impl Uart for MockUart {
        fn write(&mut self, data: &[u8]) -> Result<usize> {
            let len = if self.short_write {
                data.len() - 1
            } else {
                data.len().min(128 - self.tx_len)
            };
            self.tx_buf[self.tx_len..self.tx_len + len].copy_from_slice(&data[..len]);
            self.tx_len += len;
            Ok(len)
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

    #[test]
    fn test_cycle_writes_frames() {
        let probe = ScriptedProbe {
            readings: [23.5, DEVICE_DISCONNECTED_C, 150.0, -3.25],
            pos: 0,
        };
        let mut node = SensorNode::new(probe, MockUart::new());

        assert_eq!(node.cycle().unwrap(), Sample::reading(23.5));
        assert_eq!(node.cycle().unwrap(), Sample::fault());
        assert_eq!(node.cycle().unwrap(), Sample::fault());
        assert_eq!(node.cycle().unwrap(), Sample::reading(-3.25));
        assert_eq!(node.frames_sent(), 4);

        let (_, uart) = node.into_parts();
        assert_eq!(&uart.tx_buf[..uart.tx_len], b"23.50\nERROR\nERROR\n-3.25\n");
    }

    #[test]
    fn test_gateway_decodes_node_output() {
        let probe = ScriptedProbe {
            readings: [19.0, 21.126, DEVICE_DISCONNECTED_C, 0.0],
            pos: 0,
        };
        let mut node = SensorNode::new(probe, MockUart::new());
        for _ in 0..4 {
            node.cycle().unwrap();
        }
        let (_, uart) = node.into_parts();

        let mut decoder = LineDecoder::default();
        let mut samples = [None; 4];
        let mut n = 0;
        for &byte in &uart.tx_buf[..uart.tx_len] {
            if let Some(Decoded::Sample(sample)) = decoder.feed(byte) {
                samples[n] = Some(sample);
                n += 1;
            }
        }

        assert_eq!(n, 4);
        assert_eq!(samples[0], Some(Sample::reading(19.0)));
        // Rendered with two decimals
        assert_eq!(samples[1], Some(Sample::reading(21.13)));
        assert_eq!(samples[2], Some(Sample::fault()));
        assert_eq!(samples[3], Some(Sample::reading(0.0)));
    }

    #[test]
    fn test_short_write_is_transport_error() {
        let probe = ScriptedProbe {
            readings: [20.0; 4],
            pos: 0,
        };
        let mut uart = MockUart::new();
        uart.short_write = true;
        let mut node = SensorNode::new(probe, uart);

        assert_eq!(node.cycle(), Err(Error::TransportError));
        assert_eq!(node.frames_sent(), 0);
    }

    #[test]
    fn test_custom_range() {
        let probe = ScriptedProbe {
            readings: [5.0, 23.5, 5.0, 5.0],
            pos: 0,
        };
        let range = PlausibleRange::new(0.0, 10.0);
        let mut node = SensorNode::with_range(probe, NullUart::new(), range);

        assert_eq!(node.cycle().unwrap(), Sample::reading(5.0));
        assert_eq!(node.cycle().unwrap(), Sample::fault());

        // "5.00\n" + "ERROR\n"
        let (_, uart) = node.into_parts();
        assert_eq!(uart.written(), 11);
    }
}
