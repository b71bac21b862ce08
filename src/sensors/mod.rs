//! Sensor subsystem: probe conversions and the aggregating [`SensorHub`].
//!
//! The hub owns the two analog filters and turns raw probe data into a
//! [`SensorSnapshot`] each cycle. Sampling and conversion are separate
//! steps: `sample` runs on every cycle and only pushes into the rings when
//! each filter's interval has elapsed, `convert` reduces the rings to medians
//! and applies calibration.

pub mod adc;
pub mod filter;
pub mod ph;
pub mod tds;
pub mod temperature;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::ports::SensorPort;
use crate::config::ControlConfig;
use crate::state::SensorSnapshot;
use adc::{AdcCalibration, AnalogChannel};
use filter::{AnalogFilter, PH_SAMPLES, TDS_SAMPLES};
use ph::PhReading;
use tds::TdsReading;
use temperature::TemperatureReading;

pub struct SensorHub {
    tds: AnalogFilter<TDS_SAMPLES>,
    ph: AnalogFilter<PH_SAMPLES>,
    temperature: TemperatureReading,
}

impl SensorHub {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            tds: AnalogFilter::new(config.tds_sample_interval_ms),
            ph: AnalogFilter::new(config.ph_sample_interval_ms),
            temperature: TemperatureReading::unavailable(),
        }
    }

    /// Fill the pH ring before the first control cycle. Blocks for
    /// `PH_SAMPLES - 1` sampling intervals.
    pub fn prime(&mut self, hw: &mut impl SensorPort, delay: &mut impl DelayNs) {
        self.ph.burst(PH_SAMPLES, delay, || hw.read_adc(AnalogChannel::Ph));
        debug!("pH ring primed, median raw {}", self.ph.median());
    }

    /// Read the temperature probe and feed the analog rings whose interval
    /// has elapsed.
    pub fn sample(&mut self, now_ms: u64, hw: &mut impl SensorPort) {
        self.temperature = TemperatureReading::from_probe(hw.read_temperature_c());
        self.tds.sample(now_ms, || hw.read_adc(AnalogChannel::Tds));
        self.ph.sample(now_ms, || hw.read_adc(AnalogChannel::Ph));
    }

    /// Medians through calibration. TDS is compensated with the current
    /// temperature, or 25 °C when the probe is unavailable.
    pub fn convert(&self, config: &ControlConfig) -> SensorSnapshot {
        let adc = AdcCalibration::from_config(config);
        let temperature = self.temperature;
        let tds = TdsReading::from_raw(
            self.tds.median(),
            temperature.compensation_celsius(),
            &adc,
            config.tds_ceiling_ppm,
        );
        let ph = PhReading::from_raw(self.ph.median(), &adc, config);

        SensorSnapshot {
            temperature,
            ph,
            tds,
        }
    }

    /// Pick up new sampling intervals after a config change. Ring contents
    /// are kept.
    pub fn apply_config(&mut self, config: &ControlConfig) {
        self.tds.set_interval(config.tds_sample_interval_ms);
        self.ph.set_interval(config.ph_sample_interval_ms);
    }
}
