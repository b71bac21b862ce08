//! pH dose scheduler.
//!
//! Evaluated only when the pump has just started, so the probe sees freshly
//! mixed water. One dose timer and one cooldown timer are shared by the up
//! and down directions: after any dose, neither direction may fire again
//! until the cooldown expires. The relay that is currently dosing is
//! remembered so [`PhDoseScheduler::poll`] can release the right one.

use log::{debug, info, warn};

use super::DoseRequest;
use super::timer::Timer;
use crate::config::ControlConfig;
use crate::sensors::ph::PhReading;
use crate::state::{Actuator, ActuatorState};

/// Slack on the band edges. A reading exactly at `setpoint ± tolerance`
/// is in band even when the f32 sum rounds just inside it.
pub const BAND_EDGE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseDirection {
    Up,
    Down,
}

impl DoseDirection {
    pub const fn actuator(self) -> Actuator {
        match self {
            Self::Up => Actuator::PhUp,
            Self::Down => Actuator::PhDown,
        }
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhDecision {
    Dosed(DoseRequest),
    CooldownActive,
    DoseInFlight,
    /// Reading flagged as out of range.
    Withheld,
    InBand,
}

#[derive(Debug, Default)]
pub struct PhDoseScheduler {
    dose: Timer,
    cooldown: Timer,
    dosing: Option<DoseDirection>,
}

impl PhDoseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction currently dosing, if any.
    pub fn dosing(&self) -> Option<DoseDirection> {
        self.dosing
    }

    pub fn cooldown_active(&self, now_ms: u64) -> bool {
        self.cooldown.is_running(now_ms)
    }

    /// Release the dosing relay once the dose timer has run out. Call every
    /// cycle. Returns the relay that was switched off.
    pub fn poll(&mut self, now_ms: u64, up: &mut ActuatorState, down: &mut ActuatorState) -> Option<Actuator> {
        if !self.dose.just_finished(now_ms) {
            return None;
        }
        let direction = self.dosing.take()?;
        match direction {
            DoseDirection::Up => up.set_active(false),
            DoseDirection::Down => down.set_active(false),
        }
        info!("pH dose finished, {} off", direction.actuator());
        Some(direction.actuator())
    }

    /// Decide whether to dose on this pump start.
    pub fn evaluate(
        &mut self,
        now_ms: u64,
        ph: &PhReading,
        config: &ControlConfig,
        up: &mut ActuatorState,
        down: &mut ActuatorState,
    ) -> PhDecision {
        if self.cooldown.is_running(now_ms) {
            debug!("pH: cooldown active, {:?} left", self.cooldown.remaining(now_ms));
            return PhDecision::CooldownActive;
        }
        if self.dosing.is_some() {
            return PhDecision::DoseInFlight;
        }
        if ph.fault {
            warn!("pH: reading {:.2} out of range, dose withheld", ph.value());
            return PhDecision::Withheld;
        }

        let value = ph.value();
        let direction = if value < config.ph_setpoint - config.ph_tolerance - BAND_EDGE_EPSILON {
            DoseDirection::Up
        } else if value > config.ph_setpoint + config.ph_tolerance + BAND_EDGE_EPSILON {
            DoseDirection::Down
        } else {
            debug!("pH: {:.2} within {:.2} ± {:.2}", value, config.ph_setpoint, config.ph_tolerance);
            return PhDecision::InBand;
        };

        match direction {
            DoseDirection::Up => up.set_active(true),
            DoseDirection::Down => down.set_active(true),
        }
        let request = DoseRequest {
            target: direction.actuator(),
            duration: config.ph_dose(),
            cooldown: config.ph_cooldown(),
        };
        self.dose.start(now_ms, request.duration);
        self.cooldown.start(now_ms, request.cooldown);
        self.dosing = Some(direction);
        info!(
            "pH {:.2} vs setpoint {:.2}: dosing {} for {:?}",
            value, config.ph_setpoint, request.target, request.duration
        );
        PhDecision::Dosed(request)
    }
}
