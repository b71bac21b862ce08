//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the relay drivers and the probe inputs, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. This is the only module in the
//! system that touches actual hardware. Board support code supplies the
//! concrete pins and converters through the small traits below.

use embedded_hal::digital::OutputPin;
use log::info;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::relay::{Polarity, RelayDriver};
use crate::error::Error;
use crate::sensors::adc::AnalogChannel;
use crate::state::Actuator;

/// One-wire (or any) temperature probe.
pub trait TemperatureProbe {
    /// °C, the disconnect sentinel, or `None` when nothing answers.
    fn read_celsius(&mut self) -> Option<f32>;
}

/// A single-channel ADC conversion.
pub trait AnalogInput {
    fn read_raw(&mut self) -> u16;
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P: OutputPin, T, A, B> {
    /// Indexed by [`Actuator::index`].
    relays: heapless::Vec<RelayDriver<P>, { Actuator::COUNT }>,
    probe: T,
    tds_input: A,
    ph_input: B,
}

impl<P, T, A, B> HardwareAdapter<P, T, A, B>
where
    P: OutputPin,
    T: TemperatureProbe,
    A: AnalogInput,
    B: AnalogInput,
{
    /// `pins` in [`Actuator::ALL`] order. Every relay is driven inactive
    /// before this returns.
    pub fn new(
        pins: [P; Actuator::COUNT],
        polarity: Polarity,
        probe: T,
        tds_input: A,
        ph_input: B,
    ) -> Result<Self, Error> {
        let mut relays = heapless::Vec::new();
        for (pin, actuator) in pins.into_iter().zip(Actuator::ALL) {
            let relay = RelayDriver::new(pin, polarity, actuator.name())?;
            if relays.push(relay).is_err() {
                return Err(Error::Init("relay table overflow"));
            }
        }
        info!("HardwareAdapter ready, {} relays ({polarity:?})", relays.len());
        Ok(Self {
            relays,
            probe,
            tds_input,
            ph_input,
        })
    }

    /// Last state successfully written to the relay.
    pub fn is_active(&self, actuator: Actuator) -> bool {
        self.relays
            .get(actuator.index())
            .is_some_and(RelayDriver::is_active)
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P, T, A, B> SensorPort for HardwareAdapter<P, T, A, B>
where
    P: OutputPin,
    T: TemperatureProbe,
    A: AnalogInput,
    B: AnalogInput,
{
    fn read_temperature_c(&mut self) -> Option<f32> {
        self.probe.read_celsius()
    }

    fn read_adc(&mut self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::Tds => self.tds_input.read_raw(),
            AnalogChannel::Ph => self.ph_input.read_raw(),
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P, T, A, B> ActuatorPort for HardwareAdapter<P, T, A, B>
where
    P: OutputPin,
    T: TemperatureProbe,
    A: AnalogInput,
    B: AnalogInput,
{
    fn set_active(&mut self, actuator: Actuator, active: bool) {
        if let Some(relay) = self.relays.get_mut(actuator.index()) {
            // The driver logs the failure; the next cycle retries.
            let _ = relay.set_active(active);
        }
    }
}
