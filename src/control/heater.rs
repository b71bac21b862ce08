//! Water heater controller.
//!
//! Plain threshold control: on while the water is strictly below the
//! threshold, off otherwise. There is no hysteresis band, so a reading that
//! hovers at the threshold toggles the relay every cycle.
//!
//! The heater is held off until the start-up delay expires so the probe has
//! settled before the first decision. An unavailable probe switches it off.

use log::{debug, info};

use super::timer::Timer;
use crate::config::ControlConfig;
use crate::sensors::temperature::TemperatureReading;
use crate::state::ActuatorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaterPhase {
    /// Start-up delay running; heater held off.
    Startup,
    Active,
}

pub struct HeaterController {
    phase: HeaterPhase,
    delay: Timer,
}

impl HeaterController {
    pub fn new(now_ms: u64, config: &ControlConfig) -> Self {
        let mut delay = Timer::new();
        delay.start(now_ms, config.heater_delay());
        Self {
            phase: HeaterPhase::Startup,
            delay,
        }
    }

    pub fn phase(&self) -> HeaterPhase {
        self.phase
    }

    /// Run one control step. Returns the new relay state when it changed.
    pub fn update(
        &mut self,
        now_ms: u64,
        temperature: &TemperatureReading,
        threshold_c: f32,
        heater: &mut ActuatorState,
    ) -> Option<bool> {
        if self.phase == HeaterPhase::Startup {
            if self.delay.is_running(now_ms) {
                return None;
            }
            self.delay.just_finished(now_ms);
            self.phase = HeaterPhase::Active;
            info!("Heater start-up delay elapsed, control active");
        }

        let want_on = match temperature.celsius() {
            Some(c) => c < threshold_c,
            None => {
                debug!("Heater: temperature unavailable, holding off");
                false
            }
        };

        if heater.is_active() == want_on {
            return None;
        }
        heater.set_active(want_on);
        info!(
            "Heater {} ({:?} °C, threshold {:.1} °C)",
            if want_on { "ON" } else { "OFF" },
            temperature.celsius(),
            threshold_c
        );
        Some(want_on)
    }
}
