// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Temperature sources for the host node.

use std::path::{Path, PathBuf};
use thermolink_micro::{SensorSource, DEVICE_DISCONNECTED_C};

/// Default sysfs root of the Linux 1-Wire bus.
pub const W1_DEVICES: &str = "/sys/bus/w1/devices";

/// DS18B20 read through the Linux `w1_therm` driver.
///
/// The driver exposes the reading in millidegrees Celsius. Any read or parse
/// failure is reported as the disconnect sentinel, the same way the probe
/// itself reports a missing device.
#[derive(Debug, Clone)]
pub struct W1Thermometer {
    path: PathBuf,
}

impl W1Thermometer {
    /// Probe `device_id` (e.g. `28-0316a2795aff`) under the default sysfs root.
    pub fn new(device_id: &str) -> Self {
        Self::with_root(W1_DEVICES, device_id)
    }

    /// Probe `device_id` under `root`.
    pub fn with_root(root: impl AsRef<Path>, device_id: &str) -> Self {
        Self {
            path: root.as_ref().join(device_id).join("temperature"),
        }
    }

    /// File the reading comes from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SensorSource for W1Thermometer {
    fn read_celsius(&mut self) -> f64 {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("{}: {}", self.path.display(), e);
                return DEVICE_DISCONNECTED_C;
            }
        };

        match raw.trim().parse::<i64>() {
            Ok(milli) => milli as f64 / 1000.0,
            Err(_) => {
                tracing::debug!("{}: unexpected content {:?}", self.path.display(), raw);
                DEVICE_DISCONNECTED_C
            }
        }
    }
}

/// Deterministic triangle sweep between `low` and `high`.
#[derive(Debug, Clone)]
pub struct SimulatedThermometer {
    low: f64,
    high: f64,
    step: f64,
    current: f64,
    rising: bool,
    /// Report a disconnect every n-th reading (0 = never).
    fault_every: u32,
    reads: u32,
}

impl SimulatedThermometer {
    /// Sweep 20.00 to 26.00 in 0.25 steps.
    pub fn new() -> Self {
        Self::sweep(20.0, 26.0, 0.25)
    }

    /// Sweep `low..=high` by `step`.
    pub fn sweep(low: f64, high: f64, step: f64) -> Self {
        Self {
            low,
            high,
            step,
            current: low,
            rising: true,
            fault_every: 0,
            reads: 0,
        }
    }

    /// Inject a probe disconnect every `n` readings.
    pub fn with_faults(mut self, n: u32) -> Self {
        self.fault_every = n;
        self
    }
}

impl Default for SimulatedThermometer {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for SimulatedThermometer {
    fn read_celsius(&mut self) -> f64 {
        self.reads = self.reads.wrapping_add(1);
        if self.fault_every > 0 && self.reads % self.fault_every == 0 {
            return DEVICE_DISCONNECTED_C;
        }

        let value = self.current;

        if self.rising {
            self.current += self.step;
            if self.current >= self.high {
                self.current = self.high;
                self.rising = false;
            }
        } else {
            self.current -= self.step;
            if self.current <= self.low {
                self.current = self.low;
                self.rising = true;
            }
        }

        value
    }
}
