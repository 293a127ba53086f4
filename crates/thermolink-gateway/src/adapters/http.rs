// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Blocking HTTP transport backed by reqwest.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::dispatch::{HttpResponse, HttpTransport};
use crate::error::TransportError;

/// reqwest blocking client with a per-request timeout.
///
/// Idle pooling is disabled: every attempt opens its own connection and the
/// socket is closed once the response is dropped.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json(&mut self, url: &str, body: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .map_err(map_error)?;

        let status = response.status().as_u16();

        // A status arrived; a broken body does not undo that
        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Response body ({}) not fully read: {}", status, e);
                String::new()
            }
        };

        Ok(HttpResponse { status, body })
    }

    fn release(&mut self) {
        // Response is dropped in post_json and nothing is pooled, so the socket is already closed.
    }
}

fn map_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}
