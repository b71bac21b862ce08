//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (serial console on the board, `env_logger` in the
//! simulator). A display or network adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one line.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                let temp = t.temperature.map_or_else(|| "err".into(), |v| format!("{v:.1}"));
                info!(
                    "TELEM | T={}\u{00b0}{}{} | pH={:.2}{} | TDS={:.0}ppm{} | pump={} {}:{:02} | {}",
                    temp,
                    t.temperature_unit.suffix(),
                    if t.heater_on { " (H)" } else { "" },
                    t.ph,
                    if t.ph_fault { " (err)" } else { "" },
                    t.ppm,
                    if t.ppm_fault { " (err)" } else { "" },
                    if t.pump_on { "ON" } else { "OFF" },
                    t.pump_countdown.minutes,
                    t.pump_countdown.seconds,
                    t.clock,
                );
            }
            AppEvent::HeaterSwitched { on } => {
                info!("HEATER | {}", if *on { "ON" } else { "OFF" });
            }
            AppEvent::PumpPhaseChanged(phase) => {
                info!("PUMP | {:?}", phase);
            }
            AppEvent::DoseStarted(req) => {
                info!(
                    "DOSE | {} on for {:?}, cooldown {:?}",
                    req.target, req.duration, req.cooldown
                );
            }
            AppEvent::DoseFinished(actuator) => {
                info!("DOSE | {} off", actuator);
            }
            AppEvent::DoseSkipped { channel, reason } => {
                info!("DOSE | {:?} skipped: {:?}", channel, reason);
            }
            AppEvent::FaultDetected(flags) => {
                warn!("FAULT | detected, flags=0b{:08b}", flags);
            }
            AppEvent::FaultCleared => {
                info!("FAULT | all cleared");
            }
            AppEvent::SelfTestPulse(actuator) => {
                info!("SELFTEST | pulsing {}", actuator);
            }
            AppEvent::ConfigUpdated => {
                info!("CONFIG | updated");
            }
            AppEvent::ConfigRejected(reason) => {
                warn!("CONFIG | rejected: {}", reason);
            }
            AppEvent::Started => {
                info!("START | control loop running");
            }
        }
    }
}
