//! Controller configuration.
//!
//! Every operator-tunable setpoint, tolerance and duration lives in
//! [`ControlConfig`]. It is populated once at startup (defaults, a stored
//! blob, or a JSON file) and validated before any controller sees it.
//! Controllers only ever read it; a runtime replacement goes through
//! [`ControlConfig::validate`] first and affects future decisions only.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Unit used when presenting the water temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Single-letter suffix shown after the degree sign.
    pub fn suffix(self) -> char {
        match self {
            Self::Celsius => 'C',
            Self::Fahrenheit => 'F',
        }
    }
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    // --- Display ---
    pub temperature_unit: TemperatureUnit,
    /// Show the clock as 12-hour with an AM/PM suffix.
    pub twelve_hour_clock: bool,
    /// Append seconds to the displayed clock.
    pub display_seconds: bool,

    // --- Heater ---
    /// Heater runs while the water is strictly below this (°C).
    pub heater_threshold_c: f32,
    /// Delay after boot before the heater may switch on (minutes).
    pub heater_delay_minutes: f32,

    // --- Circulation pump ---
    /// Off period before the very first pump run (minutes).
    pub pump_init_minutes: f32,
    pub pump_on_minutes: f32,
    pub pump_off_minutes: f32,

    // --- pH ---
    pub ph_setpoint: f32,
    /// Allowed deviation either side of the setpoint before dosing.
    pub ph_tolerance: f32,
    /// Minimum time between pH doses (minutes).
    pub ph_cooldown_minutes: f32,
    pub ph_dose_seconds: f32,
    /// Probe transfer function: `ph = slope * V + intercept + offset`.
    pub ph_slope: f32,
    pub ph_intercept: f32,
    pub ph_calibration_offset: f32,

    // --- Nutrient (TDS) ---
    pub ppm_setpoint: f32,
    /// Minimum time between nutrient doses (minutes).
    pub ppm_cooldown_minutes: f32,
    pub ppm_dose_seconds: f32,
    /// Readings above this are reported as a sensor error.
    pub tds_ceiling_ppm: f32,
    /// Skip nutrient dosing while the TDS reading is flagged.
    pub withhold_nutrient_on_tds_fault: bool,

    // --- Sampling ---
    pub tds_sample_interval_ms: u32,
    pub ph_sample_interval_ms: u32,
    /// ADC reference voltage (V) and full-scale count.
    pub adc_vref_volts: f32,
    pub adc_max_count: u16,
    /// Characterised ADC transfer: `mV = raw * gain + offset`.
    pub adc_cal_mv_per_count: f32,
    pub adc_cal_offset_mv: f32,

    // --- Timing ---
    pub control_loop_interval_ms: u32,
    /// Pulse every dosing pump once before the control loop starts.
    pub self_test_on_boot: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            // Display
            temperature_unit: TemperatureUnit::Celsius,
            twelve_hour_clock: true,
            display_seconds: false,

            // Heater
            heater_threshold_c: 25.0,
            heater_delay_minutes: 0.5,

            // Pump
            pump_init_minutes: 0.5,
            pump_on_minutes: 0.5,
            pump_off_minutes: 2.0,

            // pH
            ph_setpoint: 6.2,
            ph_tolerance: 0.2,
            ph_cooldown_minutes: 60.0,
            ph_dose_seconds: 3.0,
            ph_slope: -5.70,
            ph_intercept: 21.34,
            ph_calibration_offset: 0.0,

            // Nutrient
            ppm_setpoint: 400.0,
            ppm_cooldown_minutes: 60.0,
            ppm_dose_seconds: 3.0,
            tds_ceiling_ppm: 1000.0,
            withhold_nutrient_on_tds_fault: false,

            // Sampling
            tds_sample_interval_ms: 40,
            ph_sample_interval_ms: 30,
            adc_vref_volts: 3.3,
            adc_max_count: 4095,
            adc_cal_mv_per_count: 3300.0 / 4095.0,
            adc_cal_offset_mv: 0.0,

            // Timing
            control_loop_interval_ms: 100,
            self_test_on_boot: true,
        }
    }
}

/// Longest accepted delay, pump phase or cooldown: one day.
pub const MAX_PERIOD_MINUTES: f32 = 1440.0;
/// Longest accepted single dose.
pub const MAX_DOSE_SECONDS: f32 = 600.0;

/// Saturating conversion into `0..=max_secs`. NaN maps to the maximum so a
/// bad value can never collapse into "no wait".
fn bounded_secs(secs: f32, max_secs: f32) -> Duration {
    let clamped = if secs.is_nan() { max_secs } else { secs.clamp(0.0, max_secs) };
    Duration::try_from_secs_f32(clamped).unwrap_or(Duration::from_secs(max_secs as u64))
}

fn minutes(m: f32) -> Duration {
    bounded_secs(m * 60.0, MAX_PERIOD_MINUTES * 60.0)
}

fn seconds(s: f32) -> Duration {
    bounded_secs(s, MAX_DOSE_SECONDS)
}

impl ControlConfig {
    pub fn heater_delay(&self) -> Duration {
        minutes(self.heater_delay_minutes)
    }

    pub fn pump_init(&self) -> Duration {
        minutes(self.pump_init_minutes)
    }

    pub fn pump_on(&self) -> Duration {
        minutes(self.pump_on_minutes)
    }

    pub fn pump_off(&self) -> Duration {
        minutes(self.pump_off_minutes)
    }

    pub fn ph_cooldown(&self) -> Duration {
        minutes(self.ph_cooldown_minutes)
    }

    pub fn ph_dose(&self) -> Duration {
        seconds(self.ph_dose_seconds)
    }

    pub fn ppm_cooldown(&self) -> Duration {
        minutes(self.ppm_cooldown_minutes)
    }

    pub fn ppm_dose(&self) -> Duration {
        seconds(self.ppm_dose_seconds)
    }

    /// Parse a (possibly partial) JSON document; missing fields keep their
    /// defaults. The result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=40.0).contains(&self.heater_threshold_c) {
            return Err(ConfigError::ValidationFailed(
                "heater_threshold_c must be 0.0–40.0",
            ));
        }
        for (value, msg) in [
            (self.heater_delay_minutes, "heater_delay_minutes must be 0–1440"),
            (self.pump_init_minutes, "pump_init_minutes must be 0–1440"),
            (self.ph_cooldown_minutes, "ph_cooldown_minutes must be 0–1440"),
            (self.ppm_cooldown_minutes, "ppm_cooldown_minutes must be 0–1440"),
        ] {
            if !(0.0..=MAX_PERIOD_MINUTES).contains(&value) {
                return Err(ConfigError::ValidationFailed(msg));
            }
        }
        for (value, msg) in [
            (self.pump_on_minutes, "pump_on_minutes must be > 0 and <= 1440"),
            (self.pump_off_minutes, "pump_off_minutes must be > 0 and <= 1440"),
        ] {
            if !(value > 0.0 && value <= MAX_PERIOD_MINUTES) {
                return Err(ConfigError::ValidationFailed(msg));
            }
        }
        if !(0.0..=14.0).contains(&self.ph_setpoint) {
            return Err(ConfigError::ValidationFailed("ph_setpoint must be 0.0–14.0"));
        }
        if !(0.0..=7.0).contains(&self.ph_tolerance) {
            return Err(ConfigError::ValidationFailed("ph_tolerance must be 0.0–7.0"));
        }
        if !(self.ph_dose_seconds > 0.0 && self.ph_dose_seconds <= MAX_DOSE_SECONDS) {
            return Err(ConfigError::ValidationFailed(
                "ph_dose_seconds must be > 0 and <= 600",
            ));
        }
        if !(self.ppm_dose_seconds > 0.0 && self.ppm_dose_seconds <= MAX_DOSE_SECONDS) {
            return Err(ConfigError::ValidationFailed(
                "ppm_dose_seconds must be > 0 and <= 600",
            ));
        }
        if !(self.ph_slope.is_finite()
            && self.ph_intercept.is_finite()
            && self.ph_calibration_offset.is_finite())
        {
            return Err(ConfigError::ValidationFailed(
                "pH calibration constants must be finite",
            ));
        }
        if !(self.tds_ceiling_ppm.is_finite() && self.tds_ceiling_ppm > 0.0) {
            return Err(ConfigError::ValidationFailed("tds_ceiling_ppm must be > 0"));
        }
        if !(0.0..=self.tds_ceiling_ppm).contains(&self.ppm_setpoint) {
            return Err(ConfigError::ValidationFailed(
                "ppm_setpoint must be between 0 and tds_ceiling_ppm",
            ));
        }
        if self.tds_sample_interval_ms == 0 || self.ph_sample_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "sample intervals must be > 0 ms",
            ));
        }
        if !(self.adc_vref_volts > 0.0 && self.adc_vref_volts <= 5.0) || self.adc_max_count == 0 {
            return Err(ConfigError::ValidationFailed(
                "adc_vref_volts must be 0–5 V and adc_max_count > 0",
            ));
        }
        if !(self.adc_cal_mv_per_count.is_finite()
            && self.adc_cal_mv_per_count > 0.0
            && self.adc_cal_offset_mv.is_finite())
        {
            return Err(ConfigError::ValidationFailed(
                "ADC characterisation must be finite with a positive gain",
            ));
        }
        if !(10..=5000).contains(&self.control_loop_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be 10–5000",
            ));
        }
        Ok(())
    }
}
