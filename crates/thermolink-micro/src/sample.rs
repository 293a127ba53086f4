// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Temperature samples and the sensor source abstraction

/// Value returned by a DS18B20 when the probe is disconnected
pub const DEVICE_DISCONNECTED_C: f64 = -127.0;

/// A single temperature reading or an explicit sensor fault
///
/// `valid == false` means the probe reported a fault. A missing or late
/// reading is not a `Sample` at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Temperature in degrees Celsius
    pub value: f64,
    /// Whether the reading is usable
    pub valid: bool,
}

impl Sample {
    /// Create a valid sample
    pub const fn reading(value: f64) -> Self {
        Self { value, valid: true }
    }

    /// Create a sensor-fault sample
    ///
    /// Carries [`DEVICE_DISCONNECTED_C`] so faults compare equal.
    pub const fn fault() -> Self {
        Self {
            value: DEVICE_DISCONNECTED_C,
            valid: false,
        }
    }

    /// Classify a raw acquisition result
    ///
    /// The disconnect sentinel, non-finite values and values outside `range`
    /// all become a fault.
    pub fn from_celsius(value: f64, range: &PlausibleRange) -> Self {
        if value == DEVICE_DISCONNECTED_C || !range.contains(value) {
            Self::fault()
        } else {
            Self::reading(value)
        }
    }
}

/// Physically plausible temperature interval (closed)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibleRange {
    /// Lowest accepted value
    pub min: f64,
    /// Highest accepted value
    pub max: f64,
}

impl PlausibleRange {
    /// DS18B20 deployment default: -50 ..= 100 degrees Celsius
    pub const DEFAULT: Self = Self {
        min: -50.0,
        max: 100.0,
    };

    /// Create a new range
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check whether `value` lies within the closed interval
    ///
    /// NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for PlausibleRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Port for temperature acquisition
///
/// Implemented by the probe driver (DS18B20 over 1-Wire, sysfs, mock).
pub trait SensorSource {
    /// Take one reading (blocking)
    ///
    /// Returns the temperature in degrees Celsius, or
    /// [`DEVICE_DISCONNECTED_C`] when the probe cannot be read.
    fn read_celsius(&mut self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_samples_compare_equal() {
        assert_eq!(Sample::fault(), Sample::fault());
        assert!(!Sample::fault().valid);
    }

    #[test]
    fn test_range_is_closed() {
        let range = PlausibleRange::DEFAULT;
        assert!(range.contains(-50.0));
        assert!(range.contains(100.0));
        assert!(!range.contains(-50.01));
        assert!(!range.contains(100.01));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_from_celsius() {
        let range = PlausibleRange::DEFAULT;
        assert_eq!(Sample::from_celsius(23.5, &range), Sample::reading(23.5));
        assert_eq!(
            Sample::from_celsius(DEVICE_DISCONNECTED_C, &range),
            Sample::fault()
        );
        assert_eq!(Sample::from_celsius(185.0, &range), Sample::fault());
        assert_eq!(Sample::from_celsius(f64::INFINITY, &range), Sample::fault());
    }
}
