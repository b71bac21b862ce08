//! Total dissolved solids from the conductivity probe.
//!
//! The median voltage is normalised to 25 °C before the probe's cubic
//! transfer function is applied:
//!
//! ```text
//! coeff = 1 + 0.02 * (T - 25)
//! Vc    = V / coeff
//! ppm   = (133.42 Vc³ - 255.86 Vc² + 857.39 Vc) * 0.5
//! ```

use super::adc::{AdcCalibration, CalibratedReading};
use super::temperature::REFERENCE_C;

/// Fractional conductivity change per °C.
const TEMP_COEFF_PER_C: f32 = 0.02;

pub fn compensation_coefficient(temperature_c: f32) -> f32 {
    1.0 + TEMP_COEFF_PER_C * (temperature_c - REFERENCE_C)
}

/// Cubic transfer function of the probe (input already compensated).
pub fn ppm_from_volts(v: f32) -> f32 {
    (133.42 * v * v * v - 255.86 * v * v + 857.39 * v) * 0.5
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TdsReading {
    pub reading: CalibratedReading,
    pub fault: bool,
}

impl TdsReading {
    pub fn ppm(&self) -> f32 {
        self.reading.compensated_value
    }

    /// Convert a median count. Readings above `ceiling_ppm` are flagged.
    pub fn from_raw(median_raw: u16, temperature_c: f32, adc: &AdcCalibration, ceiling_ppm: f32) -> Self {
        let voltage = adc.linear_volts(median_raw);
        let coeff = compensation_coefficient(temperature_c);
        let compensated_v = if coeff > 0.0 { voltage / coeff } else { voltage };
        let ppm = ppm_from_volts(compensated_v);
        Self {
            reading: CalibratedReading {
                raw_value: median_raw,
                voltage,
                compensated_value: ppm,
            },
            fault: ppm > ceiling_ppm,
        }
    }
}
