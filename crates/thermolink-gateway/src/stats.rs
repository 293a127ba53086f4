// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Gateway statistics

// Use AtomicU64 on 64-bit, AtomicU32 on 32-bit (ESP32, etc.)
#[cfg(not(target_pointer_width = "64"))]
use std::sync::atomic::AtomicU32 as AtomicCounter;
#[cfg(target_pointer_width = "64")]
use std::sync::atomic::AtomicU64 as AtomicCounter;

#[cfg(target_pointer_width = "64")]
type CounterValue = u64;
#[cfg(not(target_pointer_width = "64"))]
type CounterValue = u32;

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

/// Gateway statistics
#[derive(Debug)]
pub struct GatewayStats {
    /// Complete lines received on the serial link
    pub frames_rx: AtomicCounter,
    /// Bytes received on the serial link
    pub serial_rx_bytes: AtomicCounter,
    /// Lines dropped as malformed
    pub malformed_frames: AtomicCounter,
    /// `ERROR` frames (sensor faults)
    pub sensor_faults: AtomicCounter,
    /// Samples dropped by the dispatch throttle
    pub throttled: AtomicCounter,
    /// Reports accepted with a 2xx status
    pub reports_sent: AtomicCounter,
    /// Reports answered with a non-2xx status
    pub remote_rejections: AtomicCounter,
    /// Reports lost to a transport error
    pub transport_failures: AtomicCounter,
    /// Samples skipped because the link was down
    pub link_down_skips: AtomicCounter,
    /// Connect attempts started
    pub connect_attempts: AtomicCounter,
    /// Connect attempts that timed out
    pub connect_timeouts: AtomicCounter,
    /// Link losses detected while connected
    pub link_losses: AtomicCounter,
    /// Start time
    start_time: Instant,
}

impl GatewayStats {
    /// Create new statistics tracker
    pub fn new() -> Self {
        Self {
            frames_rx: AtomicCounter::new(0),
            serial_rx_bytes: AtomicCounter::new(0),
            malformed_frames: AtomicCounter::new(0),
            sensor_faults: AtomicCounter::new(0),
            throttled: AtomicCounter::new(0),
            reports_sent: AtomicCounter::new(0),
            remote_rejections: AtomicCounter::new(0),
            transport_failures: AtomicCounter::new(0),
            link_down_skips: AtomicCounter::new(0),
            connect_attempts: AtomicCounter::new(0),
            connect_timeouts: AtomicCounter::new(0),
            link_losses: AtomicCounter::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record serial bytes read
    pub fn record_serial_rx(&self, bytes: usize) {
        self.serial_rx_bytes
            .fetch_add(bytes as CounterValue, Ordering::Relaxed);
    }

    /// Record a completed line
    pub fn record_frame(&self) {
        self.frames_rx.fetch_add(1, Ordering::Relaxed);
    }

    /// Record malformed line
    pub fn record_malformed(&self) {
        self.malformed_frames.fetch_add(1, Ordering::Relaxed);
    }

    /// Record sensor fault
    pub fn record_sensor_fault(&self) {
        self.sensor_faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Record throttled sample
    pub fn record_throttled(&self) {
        self.throttled.fetch_add(1, Ordering::Relaxed);
    }

    /// Record 2xx delivery
    pub fn record_sent(&self) {
        self.reports_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Record non-2xx answer
    pub fn record_rejection(&self) {
        self.remote_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Record transport failure
    pub fn record_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record link-down skip
    pub fn record_link_down(&self) {
        self.link_down_skips.fetch_add(1, Ordering::Relaxed);
    }

    /// Record connect attempt
    pub fn record_connect_attempt(&self) {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record connect timeout
    pub fn record_connect_timeout(&self) {
        self.connect_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record link loss
    pub fn record_link_loss(&self) {
        self.link_losses.fetch_add(1, Ordering::Relaxed);
    }

    /// Get uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get snapshot of all stats
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_rx: self.frames_rx.load(Ordering::Relaxed),
            serial_rx_bytes: self.serial_rx_bytes.load(Ordering::Relaxed),
            malformed_frames: self.malformed_frames.load(Ordering::Relaxed),
            sensor_faults: self.sensor_faults.load(Ordering::Relaxed),
            throttled: self.throttled.load(Ordering::Relaxed),
            reports_sent: self.reports_sent.load(Ordering::Relaxed),
            remote_rejections: self.remote_rejections.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            link_down_skips: self.link_down_skips.load(Ordering::Relaxed),
            connect_attempts: self.connect_attempts.load(Ordering::Relaxed),
            connect_timeouts: self.connect_timeouts.load(Ordering::Relaxed),
            link_losses: self.link_losses.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Format stats as string
    pub fn format_summary(&self) -> String {
        let snap = self.snapshot();
        format!(
            "Gateway Stats (uptime: {}s)\n\
             Serial:   {} frames ({} bytes), malformed={}, sensor_faults={}\n\
             Reports:  sent={}, rejected={}, transport_failed={}, link_down={}, throttled={}\n\
             Link:     attempts={}, timeouts={}, losses={}",
            snap.uptime_secs,
            snap.frames_rx,
            snap.serial_rx_bytes,
            snap.malformed_frames,
            snap.sensor_faults,
            snap.reports_sent,
            snap.remote_rejections,
            snap.transport_failures,
            snap.link_down_skips,
            snap.throttled,
            snap.connect_attempts,
            snap.connect_timeouts,
            snap.link_losses
        )
    }
}

impl Default for GatewayStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics snapshot (immutable copy of current stats)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Complete lines received on the serial link
    pub frames_rx: CounterValue,
    /// Bytes received on the serial link
    pub serial_rx_bytes: CounterValue,
    /// Lines dropped as malformed
    pub malformed_frames: CounterValue,
    /// `ERROR` frames (sensor faults)
    pub sensor_faults: CounterValue,
    /// Samples dropped by the dispatch throttle
    pub throttled: CounterValue,
    /// Reports accepted with a 2xx status
    pub reports_sent: CounterValue,
    /// Reports answered with a non-2xx status
    pub remote_rejections: CounterValue,
    /// Reports lost to a transport error
    pub transport_failures: CounterValue,
    /// Samples skipped because the link was down
    pub link_down_skips: CounterValue,
    /// Connect attempts started
    pub connect_attempts: CounterValue,
    /// Connect attempts that timed out
    pub connect_timeouts: CounterValue,
    /// Link losses detected while connected
    pub link_losses: CounterValue,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

impl StatsSnapshot {
    /// Reports that reached the endpoint (any status code)
    pub fn reports_delivered(&self) -> CounterValue {
        self.reports_sent + self.remote_rejections
    }
}
