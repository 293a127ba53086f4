// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UART fed from standard input (or any reader).
//!
//! A helper thread blocks on the reader and forwards chunks over a channel,
//! so `try_read` never blocks the bridge loop.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;
use thermolink_micro::{Error, Result, Uart};

const READ_CHUNK: usize = 256;

/// Line source for running the gateway without serial hardware.
pub struct StdinUart {
    rx: Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
    closed: bool,
}

impl StdinUart {
    /// Read frames from the process's standard input.
    pub fn new() -> Self {
        Self::from_reader(std::io::stdin())
    }

    /// Read frames from `reader` on a helper thread.
    pub fn from_reader<R: Read + Send + 'static>(mut reader: R) -> Self {
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("thermolink-stdin".into())
            .spawn(move || {
                let mut buf = [0u8; READ_CHUNK];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            if tx.send(buf[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            tracing::warn!("Input read failed: {}", e);
                            break;
                        }
                    }
                }
                tracing::debug!("Input closed");
            });

        if let Err(e) = spawned {
            tracing::error!("Cannot start input thread: {}", e);
        }

        Self {
            rx,
            pending: VecDeque::new(),
            closed: false,
        }
    }

    /// True once the reader hit end of input and everything was consumed.
    pub fn is_closed(&self) -> bool {
        self.closed && self.pending.is_empty()
    }

    fn drain_channel(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(chunk) => self.pending.extend(chunk),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
    }

    fn take_pending(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        n
    }
}

impl Default for StdinUart {
    fn default() -> Self {
        Self::new()
    }
}

impl Uart for StdinUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        std::io::stdout()
            .write_all(data)
            .map_err(|_| Error::TransportError)?;
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize> {
        self.drain_channel();
        if self.pending.is_empty() {
            if self.closed {
                return Ok(0);
            }
            match self
                .rx
                .recv_timeout(Duration::from_millis(u64::from(timeout_ms)))
            {
                Ok(chunk) => self.pending.extend(chunk),
                Err(RecvTimeoutError::Timeout) => return Err(Error::Timeout),
                Err(RecvTimeoutError::Disconnected) => {
                    self.closed = true;
                    return Ok(0);
                }
            }
        }
        Ok(self.take_pending(buf))
    }

    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.drain_channel();
        Ok(self.take_pending(buf))
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush().map_err(|_| Error::TransportError)
    }

    fn available(&self) -> usize {
        self.pending.len()
    }
}
