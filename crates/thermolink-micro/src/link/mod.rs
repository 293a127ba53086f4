// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serial line protocol
//!
//! One ASCII line per reading, terminated by `\n`:
//!
//! ```text
//! 23.50\n      valid reading, exactly two fractional digits
//! ERROR\n      sensor fault
//! ```
//!
//! The encoder runs on the sensor node, the decoder on the gateway. Lines
//! longer than [`MAX_LINE_LEN`](crate::MAX_LINE_LEN) are truncated by the
//! decoder and reported as malformed.

mod framing;

pub use framing::{decode_line, Decoded, LineDecoder, LineEncoder, MalformedFrame, ERROR_LITERAL};
