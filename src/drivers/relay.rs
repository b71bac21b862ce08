//! Relay output driver.
//!
//! The relay board on the reservoir is active-low: pulling the pin low
//! energises the coil. Everything above this driver speaks in logical
//! "active" terms and never sees pin levels. Each relay is forced inactive
//! at construction so nothing runs before the control loop decides it
//! should.

use embedded_hal::digital::{Error as _, OutputPin, PinState};
use log::{info, warn};

use crate::error::ActuatorError;

/// Pin level that energises the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    ActiveLow,
    ActiveHigh,
}

impl Polarity {
    fn level(self, active: bool) -> PinState {
        match self {
            Self::ActiveLow => PinState::from(!active),
            Self::ActiveHigh => PinState::from(active),
        }
    }
}

pub struct RelayDriver<P: OutputPin> {
    pin: P,
    polarity: Polarity,
    active: bool,
    label: &'static str,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Take ownership of `pin` and drive it to the inactive level.
    pub fn new(pin: P, polarity: Polarity, label: &'static str) -> Result<Self, ActuatorError> {
        let mut relay = Self {
            pin,
            polarity,
            active: false,
            label,
        };
        relay.write(false)?;
        info!("Relay {label} initialised ({polarity:?}), OFF");
        Ok(relay)
    }

    /// Energise or release the relay. The logical state only changes when
    /// the pin write succeeds.
    pub fn set_active(&mut self, active: bool) -> Result<(), ActuatorError> {
        if self.active == active {
            return Ok(());
        }
        self.write(active)?;
        self.active = active;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    fn write(&mut self, active: bool) -> Result<(), ActuatorError> {
        self.pin.set_state(self.polarity.level(active)).map_err(|e| {
            warn!("Relay {}: pin write failed ({:?})", self.label, e.kind());
            ActuatorError::GpioWriteFailed
        })
    }
}
