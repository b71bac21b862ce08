//! pH probe conversion.
//!
//! `ph = slope * V + intercept + offset`, with `V` from the characterized
//! ADC path. A result outside 0–14 means the probe is unplugged or badly
//! out of calibration; the value is kept for display but flagged.

use super::adc::{AdcCalibration, CalibratedReading};
use crate::config::ControlConfig;

pub const PH_MIN: f32 = 0.0;
pub const PH_MAX: f32 = 14.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhReading {
    pub reading: CalibratedReading,
    pub fault: bool,
}

impl PhReading {
    pub fn value(&self) -> f32 {
        self.reading.compensated_value
    }

    pub fn from_raw(median_raw: u16, adc: &AdcCalibration, config: &ControlConfig) -> Self {
        let voltage = adc.characterized_volts(median_raw);
        let ph = config.ph_slope * voltage + config.ph_intercept + config.ph_calibration_offset;
        Self {
            reading: CalibratedReading {
                raw_value: median_raw,
                voltage,
                compensated_value: ph,
            },
            fault: !(PH_MIN..=PH_MAX).contains(&ph),
        }
    }
}
