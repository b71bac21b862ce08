//! Water temperature from the one-wire probe.
//!
//! The probe is read directly every cycle, no filtering. A missing device
//! and the driver's disconnect sentinel are both treated as "unavailable".

use crate::config::TemperatureUnit;

/// Value the one-wire driver reports for a disconnected probe.
pub const DEVICE_DISCONNECTED_C: f32 = -127.0;

/// Reference temperature for TDS compensation, also used as the stand-in
/// when the probe is unavailable.
pub const REFERENCE_C: f32 = 25.0;

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TemperatureReading {
    celsius: Option<f32>,
}

impl TemperatureReading {
    /// Build a reading from the probe's raw answer, mapping the sentinel
    /// and non-finite values to unavailable.
    pub fn from_probe(raw_c: Option<f32>) -> Self {
        let celsius = raw_c.filter(|c| c.is_finite() && *c > DEVICE_DISCONNECTED_C);
        Self { celsius }
    }

    pub const fn unavailable() -> Self {
        Self { celsius: None }
    }

    pub fn celsius(&self) -> Option<f32> {
        self.celsius
    }

    pub fn fahrenheit(&self) -> Option<f32> {
        self.celsius.map(celsius_to_fahrenheit)
    }

    pub fn in_unit(&self, unit: TemperatureUnit) -> Option<f32> {
        match unit {
            TemperatureUnit::Celsius => self.celsius(),
            TemperatureUnit::Fahrenheit => self.fahrenheit(),
        }
    }

    pub fn is_fault(&self) -> bool {
        self.celsius.is_none()
    }

    /// Temperature to feed the TDS compensation; 25 °C when unavailable so
    /// the coefficient degrades to 1.0.
    pub fn compensation_celsius(&self) -> f32 {
        self.celsius.unwrap_or(REFERENCE_C)
    }
}
