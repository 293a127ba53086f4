// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Report dispatch.
//!
//! Turns an accepted [`Sample`] into a JSON report and POSTs it once. There is
//! no inline retry and no queue: a failed report is abandoned and the next
//! sample produces a fresh, independent attempt.

use serde_json::value::RawValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use thermolink_micro::Sample;

use crate::config::EndpointConfig;
use crate::connectivity::ConnectionState;
use crate::error::TransportError;
use crate::stats::GatewayStats;

/// HTTP response as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Drained body.
    pub body: String,
}

impl HttpResponse {
    /// 2xx?
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client seam.
pub trait HttpTransport {
    /// POST `body` as `application/json` to `url`, reading the whole response body.
    fn post_json(&mut self, url: &str, body: &str) -> Result<HttpResponse, TransportError>;

    /// Release per-request resources. Called after every attempt.
    fn release(&mut self);
}

/// One delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// JSON object text.
    pub payload: String,
    /// Attempts made for this report (always 1, no inline retry).
    pub attempt_count: u32,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The endpoint answered with this status (2xx or not).
    Sent(u16),
    /// No status: connection refused, reset or timed out.
    TransportFailed,
    /// Link not ready; nothing was sent.
    LinkDown,
}

/// Builds and sends reports.
pub struct ReportDispatcher<H: HttpTransport> {
    url: String,
    metric_field: String,
    transport: H,
    stats: Arc<GatewayStats>,
    last_report: Option<Report>,
}

impl<H: HttpTransport> ReportDispatcher<H> {
    /// Create a dispatcher for `endpoint`.
    pub fn new(endpoint: &EndpointConfig, transport: H, stats: Arc<GatewayStats>) -> Self {
        Self {
            url: endpoint.url.clone(),
            metric_field: endpoint.metric_field.clone(),
            transport,
            stats,
            last_report: None,
        }
    }

    /// Last report built, if any.
    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }

    /// Underlying transport.
    pub fn transport(&self) -> &H {
        &self.transport
    }

    /// Deliver `sample` if it is valid and the link is ready.
    ///
    /// Returns `None` for an invalid sample (nothing to report).
    pub fn dispatch(&mut self, sample: &Sample, state: ConnectionState) -> Option<DeliveryOutcome> {
        if !sample.valid {
            tracing::info!("Sensor fault; report skipped");
            return None;
        }

        if !state.is_ready() {
            tracing::info!(
                "Link {}; reading {:.2} not reported",
                state,
                sample.value
            );
            self.stats.record_link_down();
            return Some(DeliveryOutcome::LinkDown);
        }

        let payload = match self.build_payload(sample.value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Cannot encode reading {}: {}", sample.value, e);
                return None;
            }
        };

        let report = Report {
            payload,
            attempt_count: 1,
        };

        tracing::debug!("POST {} {}", self.url, report.payload);
        let result = self.transport.post_json(&self.url, &report.payload);
        self.transport.release();
        self.last_report = Some(report);

        let outcome = match result {
            Ok(response) if response.is_success() => {
                self.stats.record_sent();
                tracing::info!("Report sent ({})", response.status);
                DeliveryOutcome::Sent(response.status)
            }
            Ok(response) => {
                self.stats.record_rejection();
                tracing::warn!(
                    "Endpoint rejected report ({}): {}",
                    response.status,
                    response.body.trim()
                );
                DeliveryOutcome::Sent(response.status)
            }
            Err(e) => {
                self.stats.record_transport_failure();
                tracing::warn!("Report not delivered: {}", e);
                DeliveryOutcome::TransportFailed
            }
        };

        Some(outcome)
    }

    /// `{"<field>":<value with 2 decimals>}`
    fn build_payload(&self, value: f64) -> Result<String, serde_json::Error> {
        let number = RawValue::from_string(format!("{:.2}", value))?;
        let mut object = BTreeMap::new();
        object.insert(self.metric_field.as_str(), number);
        serde_json::to_string(&object)
    }
}
