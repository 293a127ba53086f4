// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use thermolink_gateway::{
    GatewayConfig, HttpResponse, HttpTransport, LinkError, LinkStatus, TransportError,
    WirelessLink,
};
use thermolink_micro::Uart;

/// Link that replays scripted statuses, then repeats `fallback`.
pub struct ScriptedLink {
    script: VecDeque<LinkStatus>,
    fallback: LinkStatus,
    pub begins: usize,
    pub status_calls: usize,
}

impl ScriptedLink {
    pub fn up() -> Self {
        Self::scripted(&[], LinkStatus::Up)
    }

    pub fn down() -> Self {
        Self::scripted(&[], LinkStatus::Down)
    }

    pub fn scripted(script: &[LinkStatus], fallback: LinkStatus) -> Self {
        Self {
            script: script.iter().copied().collect(),
            fallback,
            begins: 0,
            status_calls: 0,
        }
    }

    pub fn set_fallback(&mut self, status: LinkStatus) {
        self.fallback = status;
    }
}

impl WirelessLink for ScriptedLink {
    fn begin(&mut self, _ssid: &str, _passphrase: &str) -> Result<(), LinkError> {
        self.begins += 1;
        Ok(())
    }

    fn status(&mut self) -> LinkStatus {
        self.status_calls += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }

    fn disconnect(&mut self) {}
}

/// Scripted reply for one POST.
pub enum Reply {
    Status(u16),
    Drop,
}

/// Transport that records every POST and release.
#[derive(Default)]
pub struct RecordingTransport {
    replies: VecDeque<Reply>,
    pub posts: Vec<String>,
    pub releases: usize,
}

impl RecordingTransport {
    pub fn replying(replies: Vec<Reply>) -> Self {
        Self {
            replies: replies.into(),
            ..Default::default()
        }
    }
}

impl HttpTransport for RecordingTransport {
    fn post_json(&mut self, _url: &str, body: &str) -> Result<HttpResponse, TransportError> {
        self.posts.push(body.to_string());
        match self.replies.pop_front().unwrap_or(Reply::Status(200)) {
            Reply::Status(status) => Ok(HttpResponse {
                status,
                body: "{}".into(),
            }),
            Reply::Drop => Err(TransportError::Connect("connection reset".into())),
        }
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

/// In-memory serial line; writes loop back to the read side.
#[derive(Default)]
pub struct MemUart {
    rx: VecDeque<u8>,
}

impl MemUart {
    pub fn push(&mut self, data: &[u8]) {
        self.rx.extend(data);
    }
}

impl Uart for MemUart {
    fn write(&mut self, data: &[u8]) -> thermolink_micro::Result<usize> {
        self.rx.extend(data);
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8], _timeout_ms: u32) -> thermolink_micro::Result<usize> {
        self.try_read(buf)
    }

    fn try_read(&mut self, buf: &mut [u8]) -> thermolink_micro::Result<usize> {
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn flush(&mut self) -> thermolink_micro::Result<()> {
        Ok(())
    }

    fn available(&self) -> usize {
        self.rx.len()
    }
}

/// Default configuration with a local endpoint.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::for_endpoint("http://127.0.0.1:3000/api/sensor-data");
    config.network.ssid = "SS2".into();
    config.network.passphrase = "00000000".into();
    config
}
