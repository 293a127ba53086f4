// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridge loop.
//!
//! One cooperative cycle: health-check the link, drain the serial input
//! through the line decoder, dispatch every completed sample, sleep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thermolink_micro::{Decoded, LineDecoder, MalformedFrame, Sample, Uart, MAX_LINE_LEN};

use crate::clock::Clock;
use crate::config::GatewayConfig;
use crate::connectivity::{ConnectionState, ConnectivityManager, WirelessLink};
use crate::dispatch::{DeliveryOutcome, HttpTransport, ReportDispatcher};
use crate::stats::GatewayStats;

/// Upper bound on serial reads per cycle so a chatty line cannot starve the loop.
const MAX_READS_PER_CYCLE: usize = 16;

/// What the loop did with one completed line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameDisposition {
    /// Valid sample handed to the dispatcher.
    Delivered(DeliveryOutcome),
    /// `ERROR` frame; nothing sent.
    SensorFault,
    /// Line dropped at decode time.
    Malformed(MalformedFrame),
    /// Valid sample dropped by the minimum dispatch interval.
    Throttled,
}

/// Serial-to-HTTP bridge.
pub struct BridgeLoop<U, L, H, C>
where
    U: Uart,
    L: WirelessLink,
    H: HttpTransport,
    C: Clock,
{
    uart: U,
    decoder: LineDecoder,
    connectivity: ConnectivityManager<L, C>,
    dispatcher: ReportDispatcher<H>,
    stats: Arc<GatewayStats>,
    poll_interval: Duration,
    min_dispatch_interval: Option<Duration>,
    stats_interval: Option<Duration>,
    last_dispatch: Option<Duration>,
    last_stats: Duration,
    running: Arc<AtomicBool>,
}

impl<U, L, H, C> BridgeLoop<U, L, H, C>
where
    U: Uart,
    L: WirelessLink,
    H: HttpTransport,
    C: Clock,
{
    /// Wire the bridge from its configuration and platform adapters.
    pub fn new(config: &GatewayConfig, uart: U, link: L, transport: H, clock: C) -> Self {
        let stats = Arc::new(GatewayStats::new());
        let last_stats = clock.now();

        Self {
            uart,
            decoder: LineDecoder::new(config.bridge.plausible_range()),
            connectivity: ConnectivityManager::new(
                link,
                clock,
                config.network.clone(),
                Arc::clone(&stats),
            ),
            dispatcher: ReportDispatcher::new(&config.endpoint, transport, Arc::clone(&stats)),
            stats,
            poll_interval: config.bridge.poll_interval(),
            min_dispatch_interval: config.bridge.min_dispatch_interval(),
            stats_interval: config.bridge.stats_interval(),
            last_dispatch: None,
            last_stats,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Shared statistics.
    pub fn stats(&self) -> &Arc<GatewayStats> {
        &self.stats
    }

    /// Current link state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connectivity.state()
    }

    /// Connectivity manager.
    pub fn connectivity(&self) -> &ConnectivityManager<L, C> {
        &self.connectivity
    }

    /// Report dispatcher.
    pub fn dispatcher(&self) -> &ReportDispatcher<H> {
        &self.dispatcher
    }

    /// Serial input.
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Flag checked between cycles; clear it to stop [`run`](Self::run).
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Request a stop after the current cycle.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Run cycles until the running flag clears.
    pub fn run(&mut self) {
        self.run_until(|_| false);
    }

    /// Run cycles until the running flag clears or `exhausted` reports the
    /// serial input is finished.
    pub fn run_until<F>(&mut self, mut exhausted: F)
    where
        F: FnMut(&U) -> bool,
    {
        tracing::info!("Bridge loop started");

        while self.running.load(Ordering::SeqCst) {
            if exhausted(&self.uart) {
                tracing::info!("Serial input closed");
                break;
            }
            self.run_cycle();
        }

        self.connectivity.disconnect();
        tracing::info!("Bridge loop stopped\n{}", self.stats.format_summary());
    }

    /// Run a single cycle and report what happened to each completed line.
    pub fn run_cycle(&mut self) -> Vec<FrameDisposition> {
        self.connectivity.ensure_connected();

        let mut dispositions = Vec::new();
        let mut buf = [0u8; MAX_LINE_LEN];

        for _ in 0..MAX_READS_PER_CYCLE {
            let n = match self.uart.try_read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!("Serial read failed: {}", e);
                    break;
                }
            };

            self.stats.record_serial_rx(n);
            for &byte in &buf[..n] {
                if let Some(decoded) = self.decoder.feed(byte) {
                    if let Some(disposition) = self.handle_line(decoded) {
                        dispositions.push(disposition);
                    }
                }
            }
        }

        self.maybe_log_stats();
        self.connectivity.clock().sleep(self.poll_interval);

        dispositions
    }

    fn handle_line(&mut self, decoded: Decoded) -> Option<FrameDisposition> {
        match decoded {
            Decoded::Empty => None,

            Decoded::Malformed(reason) => {
                self.stats.record_frame();
                self.stats.record_malformed();
                tracing::warn!("Discarding frame: {}", reason);
                Some(FrameDisposition::Malformed(reason))
            }

            Decoded::Sample(sample) => {
                self.stats.record_frame();
                self.handle_sample(sample)
            }
        }
    }

    fn handle_sample(&mut self, sample: Sample) -> Option<FrameDisposition> {
        if !sample.valid {
            self.stats.record_sensor_fault();
            tracing::warn!("Sensor reported ERROR (probe disconnected?)");
            self.dispatcher.dispatch(&sample, self.connectivity.state());
            return Some(FrameDisposition::SensorFault);
        }

        tracing::info!("Received reading: {:.2}", sample.value);

        let now = self.connectivity.clock().now();
        if let (Some(min), Some(last)) = (self.min_dispatch_interval, self.last_dispatch) {
            if now.saturating_sub(last) < min {
                self.stats.record_throttled();
                tracing::debug!("Reading {:.2} throttled", sample.value);
                return Some(FrameDisposition::Throttled);
            }
        }

        let outcome = self
            .dispatcher
            .dispatch(&sample, self.connectivity.state())?;

        if outcome != DeliveryOutcome::LinkDown {
            self.last_dispatch = Some(now);
        }

        Some(FrameDisposition::Delivered(outcome))
    }

    fn maybe_log_stats(&mut self) {
        let Some(interval) = self.stats_interval else {
            return;
        };

        let now = self.connectivity.clock().now();
        if now.saturating_sub(self.last_stats) >= interval {
            tracing::info!("{}", self.stats.format_summary());
            self.last_stats = now;
        }
    }
}
