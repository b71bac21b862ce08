//! Simulated reservoir and clock for running the controller on a host.
//!
//! [`SimReservoir`] keeps a crude water model (temperature, pH, dissolved
//! solids) that reacts to the relays, and answers probe reads by inverting
//! the same conversions the controller applies. [`SimClock`] is a manually
//! advanced clock that also serves as the blocking delay, so self-test and
//! burst sampling consume simulated time instead of real time.

use core::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use embedded_hal::delay::DelayNs;

use crate::app::ports::{ActuatorPort, ClockPort, SensorPort};
use crate::config::ControlConfig;
use crate::sensors::adc::{AdcCalibration, AnalogChannel};
use crate::sensors::tds::{compensation_coefficient, ppm_from_volts};
use crate::sensors::temperature::DEVICE_DISCONNECTED_C;
use crate::state::Actuator;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimClock {
    now_ms: u64,
    epoch: NaiveDateTime,
}

impl SimClock {
    /// Wall clock reads `epoch` at monotonic time zero.
    pub fn new(epoch: NaiveDateTime) -> Self {
        Self { now_ms: 0, epoch }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now_ms += by.as_millis() as u64;
    }
}

impl ClockPort for SimClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn wall_clock(&self) -> Option<NaiveDateTime> {
        let offset = TimeDelta::try_milliseconds(self.now_ms as i64)?;
        self.epoch.checked_add_signed(offset)
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(Duration::from_millis(u64::from(ms)));
    }
}

// ---------------------------------------------------------------------------
// Reservoir model
// ---------------------------------------------------------------------------

/// Rates per second of simulated time.
const AMBIENT_C: f32 = 19.0;
const HEATER_C_PER_S: f32 = 0.004;
const COOLING_PER_S: f32 = 0.0004;
const PH_DRIFT_PER_S: f32 = 0.000_05;
const PH_DOSE_PER_S: f32 = 0.03;
const PPM_UPTAKE_PER_S: f32 = 0.004;
const PPM_DOSE_PER_S: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct SimReservoir {
    pub temperature_c: f32,
    pub ph: f32,
    pub ppm: f32,
    /// Probe unplugged: reads return the disconnect sentinel.
    pub probe_disconnected: bool,
    relays: [bool; Actuator::COUNT],
    adc: AdcCalibration,
    ph_slope: f32,
    ph_intercept: f32,
    ph_offset: f32,
    noise: u32,
}

impl SimReservoir {
    pub fn new(config: &ControlConfig, temperature_c: f32, ph: f32, ppm: f32) -> Self {
        Self {
            temperature_c,
            ph,
            ppm,
            probe_disconnected: false,
            relays: [false; Actuator::COUNT],
            adc: AdcCalibration::from_config(config),
            ph_slope: config.ph_slope,
            ph_intercept: config.ph_intercept,
            ph_offset: config.ph_calibration_offset,
            noise: 0x2545_F491,
        }
    }

    pub fn is_active(&self, actuator: Actuator) -> bool {
        self.relays[actuator.index()]
    }

    /// Advance the water model by `dt` under the current relay states.
    pub fn step(&mut self, dt: Duration) {
        let s = dt.as_secs_f32();
        let on = |a: Actuator| if self.relays[a.index()] { s } else { 0.0 };

        let heat = on(Actuator::Heater) * HEATER_C_PER_S;
        let loss = (self.temperature_c - AMBIENT_C) * COOLING_PER_S * s;
        let ph_delta = PH_DRIFT_PER_S * s + (on(Actuator::PhUp) - on(Actuator::PhDown)) * PH_DOSE_PER_S;
        let ppm_delta =
            (on(Actuator::NutrientA) + on(Actuator::NutrientB)) * PPM_DOSE_PER_S - PPM_UPTAKE_PER_S * s;

        self.temperature_c += heat - loss;
        self.ph = (self.ph + ph_delta).clamp(0.0, 14.0);
        self.ppm = (self.ppm + ppm_delta).max(0.0);
    }

    /// Small deterministic jitter in ADC counts (xorshift32).
    fn jitter(&mut self) -> i32 {
        let mut x = self.noise;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.noise = x;
        (x % 7) as i32 - 3
    }

    fn to_counts(&mut self, volts: f32, per_count_v: f32) -> u16 {
        let counts = (volts / per_count_v).round() as i32 + self.jitter();
        counts.clamp(0, i32::from(self.adc.max_count)) as u16
    }

    fn tds_counts(&mut self) -> u16 {
        // Invert the cubic by bisection; it is monotonic over the ADC range.
        let (mut lo, mut hi) = (0.0_f32, self.adc.vref_volts);
        for _ in 0..32 {
            let mid = 0.5 * (lo + hi);
            if ppm_from_volts(mid) < self.ppm {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let volts = lo * compensation_coefficient(self.temperature_c);
        let per_count = self.adc.vref_volts / f32::from(self.adc.max_count.max(1));
        self.to_counts(volts, per_count)
    }

    fn ph_counts(&mut self) -> u16 {
        let volts = (self.ph - self.ph_intercept - self.ph_offset) / self.ph_slope;
        let mv = volts * 1000.0 - self.adc.offset_mv;
        let per_count = self.adc.mv_per_count / 1000.0;
        self.to_counts(mv / 1000.0, per_count)
    }
}

impl SensorPort for SimReservoir {
    fn read_temperature_c(&mut self) -> Option<f32> {
        if self.probe_disconnected {
            Some(DEVICE_DISCONNECTED_C)
        } else {
            Some(self.temperature_c)
        }
    }

    fn read_adc(&mut self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::Tds => self.tds_counts(),
            AnalogChannel::Ph => self.ph_counts(),
        }
    }
}

impl ActuatorPort for SimReservoir {
    fn set_active(&mut self, actuator: Actuator, active: bool) {
        self.relays[actuator.index()] = active;
    }
}
