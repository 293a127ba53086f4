// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Line framing for the sensor serial link
//!
//! ## Frame Format
//!
//! ```text
//! +-----------------------------+------+
//! | "-12.34" / "23.50" / "ERROR" | '\n' |
//! +-----------------------------+------+
//! ```
//!
//! - Numeric frames always carry exactly two fractional digits
//! - Surrounding whitespace (including a trailing `\r`) is ignored on decode
//! - Decoded values must fall inside a [`PlausibleRange`]

use core::fmt::{self, Write};

use crate::error::{Error, Result};
use crate::sample::{PlausibleRange, Sample};
use crate::{LINE_DELIMITER, MAX_LINE_LEN};

/// Reserved frame body for a sensor fault
pub const ERROR_LITERAL: &[u8] = b"ERROR";

/// Why a completed line was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MalformedFrame {
    /// Line exceeded the receive buffer and was truncated
    Overflow,
    /// Line is not valid UTF-8
    NotUtf8,
    /// Line is neither a number nor `ERROR`
    Unparsable,
    /// Number parsed but lies outside the plausible range
    OutOfRange(f64),
}

impl fmt::Display for MalformedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedFrame::Overflow => write!(f, "line exceeds {} bytes", MAX_LINE_LEN),
            MalformedFrame::NotUtf8 => write!(f, "line is not valid UTF-8"),
            MalformedFrame::Unparsable => write!(f, "line is not a number"),
            MalformedFrame::OutOfRange(v) => write!(f, "value {:.2} out of plausible range", v),
        }
    }
}

/// Result of decoding one complete line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoded {
    /// Blank line, ignored silently
    Empty,
    /// Valid reading or sensor fault
    Sample(Sample),
    /// Rejected line, dropped with a diagnostic
    Malformed(MalformedFrame),
}

/// Frame encoder for outgoing samples
#[derive(Debug)]
pub struct LineEncoder {
    // Stateless encoder
}

impl LineEncoder {
    /// Create a new line encoder
    pub const fn new() -> Self {
        Self {}
    }

    /// Encode a sample into a frame, delimiter included
    ///
    /// # Returns
    ///
    /// Frame length
    pub fn encode(&self, sample: &Sample, buf: &mut [u8]) -> Result<usize> {
        let mut cursor = Cursor { buf, pos: 0 };

        if sample.valid {
            if !sample.value.is_finite() {
                return Err(Error::InvalidData);
            }
            write!(cursor, "{:.2}", sample.value).map_err(|_| Error::BufferTooSmall)?;
        } else {
            cursor
                .put(ERROR_LITERAL)
                .map_err(|_| Error::BufferTooSmall)?;
        }

        cursor
            .put(&[LINE_DELIMITER])
            .map_err(|_| Error::BufferTooSmall)?;

        Ok(cursor.pos)
    }
}

impl Default for LineEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded writer over a byte slice
struct Cursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn put(&mut self, bytes: &[u8]) -> fmt::Result {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

impl Write for Cursor<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put(s.as_bytes())
    }
}

/// Classify one complete line (delimiter optional)
pub fn decode_line(line: &[u8], range: &PlausibleRange) -> Decoded {
    let line = line.trim_ascii();

    if line.is_empty() {
        return Decoded::Empty;
    }

    if line == ERROR_LITERAL {
        return Decoded::Sample(Sample::fault());
    }

    let Ok(text) = core::str::from_utf8(line) else {
        return Decoded::Malformed(MalformedFrame::NotUtf8);
    };

    match text.parse::<f64>() {
        // "inf" and "NaN" parse but are not readings
        Ok(value) if !value.is_finite() => Decoded::Malformed(MalformedFrame::Unparsable),
        Ok(value) if range.contains(value) => Decoded::Sample(Sample::reading(value)),
        Ok(value) => Decoded::Malformed(MalformedFrame::OutOfRange(value)),
        Err(_) => Decoded::Malformed(MalformedFrame::Unparsable),
    }
}

/// Line decoder for incoming bytes
///
/// Buffers bytes until the delimiter arrives; partial lines are never
/// decoded.
#[derive(Debug)]
pub struct LineDecoder {
    /// Line buffer
    buf: [u8; MAX_LINE_LEN],

    /// Bytes currently buffered
    len: usize,

    /// Bytes were dropped since the last delimiter
    overflowed: bool,

    /// Accepted value interval
    range: PlausibleRange,
}

impl LineDecoder {
    /// Create a new line decoder
    pub const fn new(range: PlausibleRange) -> Self {
        Self {
            buf: [0u8; MAX_LINE_LEN],
            len: 0,
            overflowed: false,
            range,
        }
    }

    /// Reset decoder state, dropping any partial line
    pub fn reset(&mut self) {
        self.len = 0;
        self.overflowed = false;
    }

    /// Feed a byte to the decoder
    ///
    /// # Returns
    ///
    /// `Some(decoded)` when the byte completes a line
    pub fn feed(&mut self, byte: u8) -> Option<Decoded> {
        if byte == LINE_DELIMITER {
            let decoded = if self.overflowed {
                Decoded::Malformed(MalformedFrame::Overflow)
            } else {
                decode_line(&self.buf[..self.len], &self.range)
            };
            self.reset();
            return Some(decoded);
        }

        if self.len < MAX_LINE_LEN {
            self.buf[self.len] = byte;
            self.len += 1;
        } else {
            self.overflowed = true;
        }
        None
    }

    /// Check if decoder holds a partial line
    pub const fn is_receiving(&self) -> bool {
        self.len > 0 || self.overflowed
    }

    /// Accepted value interval
    pub const fn range(&self) -> &PlausibleRange {
        &self.range
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new(PlausibleRange::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(decoder: &mut LineDecoder, bytes: &[u8]) -> Option<Decoded> {
        let mut last = None;
        for &byte in bytes {
            if let Some(decoded) = decoder.feed(byte) {
                last = Some(decoded);
            }
        }
        last
    }

    #[test]
    fn test_encoder_valid_two_decimals() {
        let encoder = LineEncoder::new();
        let mut buf = [0u8; 16];

        let len = encoder.encode(&Sample::reading(23.5), &mut buf).unwrap();
        assert_eq!(&buf[..len], b"23.50\n");

        let len = encoder.encode(&Sample::reading(-7.0), &mut buf).unwrap();
        assert_eq!(&buf[..len], b"-7.00\n");

        let len = encoder.encode(&Sample::reading(19.999), &mut buf).unwrap();
        assert_eq!(&buf[..len], b"20.00\n");
    }

    #[test]
    fn test_encoder_fault() {
        let encoder = LineEncoder::new();
        let mut buf = [0u8; 16];

        let len = encoder.encode(&Sample::fault(), &mut buf).unwrap();
        assert_eq!(&buf[..len], b"ERROR\n");
    }

    #[test]
    fn test_encoder_buffer_too_small() {
        let encoder = LineEncoder::new();
        let mut buf = [0u8; 5]; // "23.50" fits, delimiter does not

        let result = encoder.encode(&Sample::reading(23.5), &mut buf);
        assert_eq!(result, Err(Error::BufferTooSmall));
    }

    #[test]
    fn test_encoder_rejects_non_finite() {
        let encoder = LineEncoder::new();
        let mut buf = [0u8; 16];

        let result = encoder.encode(&Sample::reading(f64::NAN), &mut buf);
        assert_eq!(result, Err(Error::InvalidData));
    }

    #[test]
    fn test_encoded_frame_has_single_delimiter() {
        let encoder = LineEncoder::new();
        let mut buf = [0u8; 32];

        for value in [-50.0, -0.004, 0.0, 12.345, 99.99, 100.0] {
            let len = encoder.encode(&Sample::reading(value), &mut buf).unwrap();
            let delimiters = buf[..len].iter().filter(|&&b| b == LINE_DELIMITER).count();
            assert_eq!(delimiters, 1);
            assert_eq!(buf[len - 1], LINE_DELIMITER);
        }
    }

    #[test]
    fn test_decode_error_literal_with_whitespace() {
        let range = PlausibleRange::DEFAULT;
        assert_eq!(decode_line(b"ERROR\n", &range), Decoded::Sample(Sample::fault()));
        assert_eq!(
            decode_line(b"  ERROR \r\n", &range),
            Decoded::Sample(Sample::fault())
        );
        assert_eq!(decode_line(b"\tERROR", &range), Decoded::Sample(Sample::fault()));
    }

    #[test]
    fn test_decode_empty_is_ignored() {
        let range = PlausibleRange::DEFAULT;
        assert_eq!(decode_line(b"\n", &range), Decoded::Empty);
        assert_eq!(decode_line(b"   \r\n", &range), Decoded::Empty);
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let range = PlausibleRange::DEFAULT;
        for line in [&b"hello\n"[..], b"23.5C\n", b"error\n", b"ERR\n", b"inf\n", b"NaN\n"] {
            assert_eq!(
                decode_line(line, &range),
                Decoded::Malformed(MalformedFrame::Unparsable)
            );
        }
        assert_eq!(
            decode_line(&[0xFF, 0xFE, b'\n'], &range),
            Decoded::Malformed(MalformedFrame::NotUtf8)
        );
    }

    #[test]
    fn test_decode_out_of_range() {
        let range = PlausibleRange::DEFAULT;
        assert_eq!(
            decode_line(b"-127.00\n", &range),
            Decoded::Malformed(MalformedFrame::OutOfRange(-127.0))
        );
        assert_eq!(
            decode_line(b"100.01\n", &range),
            Decoded::Malformed(MalformedFrame::OutOfRange(100.01))
        );
        // Bounds are inclusive
        assert_eq!(
            decode_line(b"100.00\n", &range),
            Decoded::Sample(Sample::reading(100.0))
        );
        assert_eq!(
            decode_line(b"-50.00\n", &range),
            Decoded::Sample(Sample::reading(-50.0))
        );
    }

    #[test]
    fn test_decoder_waits_for_delimiter() {
        let mut decoder = LineDecoder::default();

        for &byte in b"23.5" {
            assert!(decoder.feed(byte).is_none());
        }
        assert!(decoder.is_receiving());

        assert!(decoder.feed(b'0').is_none());
        let result = decoder.feed(b'\n');
        assert_eq!(result, Some(Decoded::Sample(Sample::reading(23.5))));
        assert!(!decoder.is_receiving());
    }

    #[test]
    fn test_decoder_multiple_lines() {
        let mut decoder = LineDecoder::default();
        let mut results = [None; 3];
        let mut n = 0;

        for &byte in b"21.00\r\nERROR\r\n22.25\r\n" {
            if let Some(decoded) = decoder.feed(byte) {
                results[n] = Some(decoded);
                n += 1;
            }
        }

        assert_eq!(n, 3);
        assert_eq!(results[0], Some(Decoded::Sample(Sample::reading(21.0))));
        assert_eq!(results[1], Some(Decoded::Sample(Sample::fault())));
        assert_eq!(results[2], Some(Decoded::Sample(Sample::reading(22.25))));
    }

    #[test]
    fn test_decoder_overflow_is_malformed() {
        let mut decoder = LineDecoder::default();
        let long = [b'1'; MAX_LINE_LEN + 10];

        for &byte in &long {
            assert!(decoder.feed(byte).is_none());
        }
        assert_eq!(
            decoder.feed(b'\n'),
            Some(Decoded::Malformed(MalformedFrame::Overflow))
        );

        // Next line decodes normally
        let result = decode_all(&mut decoder, b"18.75\n");
        assert_eq!(result, Some(Decoded::Sample(Sample::reading(18.75))));
    }

    #[test]
    fn test_decoder_line_at_capacity_is_accepted() {
        let mut decoder = LineDecoder::default();
        let mut line = [b' '; MAX_LINE_LEN];
        line[MAX_LINE_LEN - 5..].copy_from_slice(b"12.50");

        assert!(decode_all(&mut decoder, &line).is_none());
        assert_eq!(
            decoder.feed(b'\n'),
            Some(Decoded::Sample(Sample::reading(12.5)))
        );
    }

    #[test]
    fn test_decoder_custom_range() {
        let mut decoder = LineDecoder::new(PlausibleRange::new(0.0, 60.0));

        let result = decode_all(&mut decoder, b"-5.00\n");
        assert_eq!(result, Some(Decoded::Malformed(MalformedFrame::OutOfRange(-5.0))));
        assert_eq!(decoder.range().max, 60.0);
    }

    #[test]
    fn test_roundtrip_plausible_values() {
        let encoder = LineEncoder::new();
        let mut decoder = LineDecoder::default();
        let mut buf = [0u8; 16];

        for value in [-50.0, -12.345, 0.0, 0.005, 23.5, 36.6, 99.994, 100.0] {
            let sample = Sample::reading(value);
            let len = encoder.encode(&sample, &mut buf).unwrap();

            match decode_all(&mut decoder, &buf[..len]) {
                Some(Decoded::Sample(decoded)) => {
                    assert!(decoded.valid);
                    assert!((decoded.value - value).abs() <= 0.005 + f64::EPSILON);
                }
                other => panic!("unexpected decode of {}: {:?}", value, other),
            }
        }

        let len = encoder.encode(&Sample::fault(), &mut buf).unwrap();
        assert_eq!(
            decode_all(&mut decoder, &buf[..len]),
            Some(Decoded::Sample(Sample::fault()))
        );
    }
}
