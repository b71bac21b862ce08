//! Circulation pump duty cycle.
//!
//! ```text
//!   boot ──(init delay)──▶ ON ──(on time)──▶ OFF ──(off time)──▶ ON ...
//! ```
//!
//! The pump starts in OFF with the off timer loaded with the initial delay.
//! Exactly one transition can happen per cycle. The OFF→ON edge is reported
//! to the caller because the pH scheduler only evaluates on fresh
//! circulation.

use core::time::Duration;

use log::info;

use super::timer::Timer;
use crate::config::ControlConfig;
use crate::state::ActuatorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpPhase {
    Off,
    On,
}

/// Edge reported by [`PumpController::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpTransition {
    Started,
    Stopped,
}

/// Remaining time split for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    pub minutes: u32,
    pub seconds: u32,
}

impl From<Duration> for Countdown {
    fn from(d: Duration) -> Self {
        let secs = d.as_secs();
        Self {
            minutes: (secs / 60) as u32,
            seconds: (secs % 60) as u32,
        }
    }
}

pub struct PumpController {
    phase: PumpPhase,
    off_timer: Timer,
    on_timer: Timer,
}

impl PumpController {
    pub fn new(now_ms: u64, config: &ControlConfig) -> Self {
        let mut off_timer = Timer::new();
        off_timer.start(now_ms, config.pump_init());
        Self {
            phase: PumpPhase::Off,
            off_timer,
            on_timer: Timer::new(),
        }
    }

    pub fn phase(&self) -> PumpPhase {
        self.phase
    }

    pub fn update(&mut self, now_ms: u64, config: &ControlConfig, pump: &mut ActuatorState) -> Option<PumpTransition> {
        match self.phase {
            PumpPhase::Off if self.off_timer.just_finished(now_ms) => {
                self.phase = PumpPhase::On;
                self.on_timer.start(now_ms, config.pump_on());
                pump.set_active(true);
                info!("Pump ON for {:?}", config.pump_on());
                Some(PumpTransition::Started)
            }
            PumpPhase::On if self.on_timer.just_finished(now_ms) => {
                self.phase = PumpPhase::Off;
                self.off_timer.start(now_ms, config.pump_off());
                pump.set_active(false);
                info!("Pump OFF for {:?}", config.pump_off());
                Some(PumpTransition::Stopped)
            }
            _ => None,
        }
    }

    /// Time left in the current phase.
    pub fn remaining(&self, now_ms: u64) -> Duration {
        match self.phase {
            PumpPhase::Off => self.off_timer.remaining(now_ms),
            PumpPhase::On => self.on_timer.remaining(now_ms),
        }
    }

    pub fn countdown(&self, now_ms: u64) -> Countdown {
        self.remaining(now_ms).into()
    }
}
