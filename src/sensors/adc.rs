//! ADC count to voltage conversion.
//!
//! Two paths exist because the two probes were calibrated differently: TDS
//! uses the plain linear `raw * vref / full_scale` mapping, pH uses the
//! characterized gain and offset measured for the converter on the board.

use crate::config::ControlConfig;

/// Which analog input a raw count came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    Tds,
    Ph,
}

/// Raw count, derived voltage and final engineering value for one probe.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibratedReading {
    /// Median-filtered ADC count.
    pub raw_value: u16,
    pub voltage: f32,
    /// pH units or ppm, after compensation.
    pub compensated_value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcCalibration {
    pub vref_volts: f32,
    pub max_count: u16,
    pub mv_per_count: f32,
    pub offset_mv: f32,
}

impl AdcCalibration {
    pub fn from_config(config: &ControlConfig) -> Self {
        Self {
            vref_volts: config.adc_vref_volts,
            max_count: config.adc_max_count,
            mv_per_count: config.adc_cal_mv_per_count,
            offset_mv: config.adc_cal_offset_mv,
        }
    }

    /// `raw * vref / max_count`.
    pub fn linear_volts(&self, raw: u16) -> f32 {
        f32::from(raw) * self.vref_volts / f32::from(self.max_count.max(1))
    }

    /// Characterized conversion: `(raw * mv_per_count + offset_mv) / 1000`.
    pub fn characterized_volts(&self, raw: u16) -> f32 {
        (f32::from(raw) * self.mv_per_count + self.offset_mv) / 1000.0
    }
}
