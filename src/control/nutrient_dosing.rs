//! Two-part nutrient dose scheduler.
//!
//! A low TDS reading doses part A and leaves part B pending; the next
//! evaluation that finds the cooldown expired doses B regardless of the
//! reading. Both parts share one cooldown, and a new dose never starts while
//! either part is still running, so A and B can never overlap. When the
//! config asks to withhold on a TDS fault, a pending B waits as well.

use log::{debug, info};

use super::DoseRequest;
use super::timer::Timer;
use crate::config::ControlConfig;
use crate::sensors::tds::TdsReading;
use crate::state::{Actuator, ActuatorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutrientPart {
    A,
    B,
}

impl NutrientPart {
    pub const fn actuator(self) -> Actuator {
        match self {
            Self::A => Actuator::NutrientA,
            Self::B => Actuator::NutrientB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutrientDecision {
    Dosed(DoseRequest),
    CooldownActive,
    DoseInFlight,
    /// TDS flagged and the config asks to withhold on fault.
    Withheld,
    AtSetpoint,
}

#[derive(Debug, Default)]
pub struct NutrientDoseScheduler {
    dose_a: Timer,
    dose_b: Timer,
    cooldown: Timer,
    b_pending: bool,
}

impl NutrientDoseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn b_pending(&self) -> bool {
        self.b_pending
    }

    pub fn cooldown_active(&self, now_ms: u64) -> bool {
        self.cooldown.is_running(now_ms)
    }

    /// Release whichever part's dose has just run out.
    pub fn poll(
        &mut self,
        now_ms: u64,
        a: &mut ActuatorState,
        b: &mut ActuatorState,
    ) -> heapless::Vec<Actuator, 2> {
        let mut stopped = heapless::Vec::new();
        if self.dose_a.just_finished(now_ms) {
            a.set_active(false);
            info!("Nutrient A dose finished");
            let _ = stopped.push(Actuator::NutrientA);
        }
        if self.dose_b.just_finished(now_ms) {
            b.set_active(false);
            info!("Nutrient B dose finished");
            let _ = stopped.push(Actuator::NutrientB);
        }
        stopped
    }

    /// Run the A/B decision. Call every cycle after [`Self::poll`].
    pub fn evaluate(
        &mut self,
        now_ms: u64,
        tds: &TdsReading,
        config: &ControlConfig,
        a: &mut ActuatorState,
        b: &mut ActuatorState,
    ) -> NutrientDecision {
        if self.cooldown.is_running(now_ms) {
            return NutrientDecision::CooldownActive;
        }
        if self.dose_a.is_running(now_ms) || self.dose_b.is_running(now_ms) {
            return NutrientDecision::DoseInFlight;
        }

        if tds.fault && config.withhold_nutrient_on_tds_fault {
            debug!("Nutrient: TDS {:.0} ppm flagged, dose withheld", tds.ppm());
            return NutrientDecision::Withheld;
        }

        let part = if self.b_pending {
            self.b_pending = false;
            NutrientPart::B
        } else if tds.ppm() < config.ppm_setpoint {
            self.b_pending = true;
            NutrientPart::A
        } else {
            debug!("Nutrient: {:.0} ppm at or above {:.0}", tds.ppm(), config.ppm_setpoint);
            return NutrientDecision::AtSetpoint;
        };

        let request = DoseRequest {
            target: part.actuator(),
            duration: config.ppm_dose(),
            cooldown: config.ppm_cooldown(),
        };
        match part {
            NutrientPart::A => {
                a.set_active(true);
                self.dose_a.start(now_ms, request.duration);
            }
            NutrientPart::B => {
                b.set_active(true);
                self.dose_b.start(now_ms, request.duration);
            }
        }
        self.cooldown.start(now_ms, request.cooldown);
        info!(
            "Nutrient {:.0} ppm vs setpoint {:.0}: dosing {} for {:?}",
            tds.ppm(),
            config.ppm_setpoint,
            request.target,
            request.duration
        );
        NutrientDecision::Dosed(request)
    }
}
