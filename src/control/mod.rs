//! Control logic: the countdown timer and the four independent controllers
//! built on it. Each controller owns its timers and touches only its own
//! relays; the orchestrator decides the order they run in.

pub mod heater;
pub mod nutrient_dosing;
pub mod ph_dosing;
pub mod pump;
pub mod timer;

use core::time::Duration;

use crate::state::Actuator;

/// A dose that has just been started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoseRequest {
    pub target: Actuator,
    pub duration: Duration,
    /// Cooldown armed together with the dose.
    pub cooldown: Duration,
}
