//! Mock hardware adapter for integration tests.
//!
//! Records every relay call so tests can assert on the full command history
//! without touching real GPIO. Probe values are plain fields; helpers turn a
//! desired pH or ppm into the raw count the controller will decode back.

use chrono::NaiveDateTime;
use embedded_hal::delay::DelayNs;

use hydroctl::app::events::AppEvent;
use hydroctl::app::ports::{ActuatorPort, ClockPort, EventSink, SensorPort};
use hydroctl::config::ControlConfig;
use hydroctl::sensors::adc::{AdcCalibration, AnalogChannel};
use hydroctl::sensors::tds::{compensation_coefficient, ppm_from_volts};
use hydroctl::state::Actuator;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCall {
    pub actuator: Actuator,
    pub active: bool,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub temperature_c: Option<f32>,
    pub tds_raw: u16,
    pub ph_raw: u16,
    relays: [bool; Actuator::COUNT],
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            temperature_c: Some(22.0),
            tds_raw: 0,
            ph_raw: 0,
            relays: [false; Actuator::COUNT],
        }
    }

    /// Healthy water at the given chemistry, 22 °C.
    pub fn with_water(config: &ControlConfig, ph: f32, ppm: f32) -> Self {
        let mut hw = Self::new();
        hw.set_ph(config, ph);
        hw.set_ppm(config, ppm);
        hw
    }

    pub fn is_on(&self, actuator: Actuator) -> bool {
        self.relays[actuator.index()]
    }

    pub fn set_ph(&mut self, config: &ControlConfig, ph: f32) {
        self.ph_raw = ph_raw_for(config, ph);
    }

    pub fn set_ppm(&mut self, config: &ControlConfig, ppm: f32) {
        let t = self.temperature_c.unwrap_or(25.0);
        self.tds_raw = tds_raw_for(config, ppm, t);
    }

    /// Number of times `actuator` was switched on (rising edges only).
    pub fn activations(&self, actuator: Actuator) -> usize {
        let mut on = false;
        let mut count = 0;
        for call in self.calls.iter().filter(|c| c.actuator == actuator) {
            if call.active && !on {
                count += 1;
            }
            on = call.active;
        }
        count
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn set_active(&mut self, actuator: Actuator, active: bool) {
        self.relays[actuator.index()] = active;
        self.calls.push(ActuatorCall { actuator, active });
    }
}

impl SensorPort for MockHardware {
    fn read_temperature_c(&mut self) -> Option<f32> {
        self.temperature_c
    }

    fn read_adc(&mut self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::Tds => self.tds_raw,
            AnalogChannel::Ph => self.ph_raw,
        }
    }
}

pub fn ph_raw_for(config: &ControlConfig, ph: f32) -> u16 {
    let volts = (ph - config.ph_intercept - config.ph_calibration_offset) / config.ph_slope;
    ((volts * 1000.0 - config.adc_cal_offset_mv) / config.adc_cal_mv_per_count).round() as u16
}

pub fn tds_raw_for(config: &ControlConfig, ppm: f32, temperature_c: f32) -> u16 {
    let adc = AdcCalibration::from_config(config);
    let (mut lo, mut hi) = (0.0_f32, adc.vref_volts);
    for _ in 0..40 {
        let mid = 0.5 * (lo + hi);
        if ppm_from_volts(mid) < ppm {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let volts = hi * compensation_coefficient(temperature_c);
    (volts * f32::from(adc.max_count) / adc.vref_volts).round() as u16
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    pub now_ms: u64,
    pub wall: Option<NaiveDateTime>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self { now_ms: 0, wall: None }
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn wall_clock(&self) -> Option<NaiveDateTime> {
        self.wall
    }
}

impl DelayNs for MockClock {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ms += u64::from(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_ms += u64::from(ms);
    }
}

// ── Event sink ────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
