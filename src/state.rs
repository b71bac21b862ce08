//! Shared system state owned by the control orchestrator.
//!
//! `SystemState` is the blackboard every cycle reads from and writes to: the
//! latest sensor snapshot, the logical state of each relay, the accumulated
//! sensor fault bitmask and the formatted clock. Controllers never see the
//! whole struct; the orchestrator hands each one only its own slice.

use crate::error::SensorFault;
use crate::sensors::ph::PhReading;
use crate::sensors::tds::TdsReading;
use crate::sensors::temperature::TemperatureReading;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// The six relay-driven devices on the reservoir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Actuator {
    Heater = 0,
    Pump = 1,
    PhUp = 2,
    PhDown = 3,
    NutrientA = 4,
    NutrientB = 5,
}

impl Actuator {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Heater,
        Self::Pump,
        Self::PhUp,
        Self::PhDown,
        Self::NutrientA,
        Self::NutrientB,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Heater => "heater",
            Self::Pump => "pump",
            Self::PhUp => "ph-up",
            Self::PhDown => "ph-down",
            Self::NutrientA => "nutrient-A",
            Self::NutrientB => "nutrient-B",
        }
    }
}

impl core::fmt::Display for Actuator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical on/off state of one relay. Polarity is the driver's business.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorState {
    active: bool,
}

impl ActuatorState {
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(self) -> bool {
        self.active
    }
}

/// Desired state of every relay. All off at power-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actuators {
    pub heater: ActuatorState,
    pub pump: ActuatorState,
    pub ph_up: ActuatorState,
    pub ph_down: ActuatorState,
    pub nutrient_a: ActuatorState,
    pub nutrient_b: ActuatorState,
}

impl Actuators {
    pub fn get(&self, actuator: Actuator) -> ActuatorState {
        match actuator {
            Actuator::Heater => self.heater,
            Actuator::Pump => self.pump,
            Actuator::PhUp => self.ph_up,
            Actuator::PhDown => self.ph_down,
            Actuator::NutrientA => self.nutrient_a,
            Actuator::NutrientB => self.nutrient_b,
        }
    }

    pub fn is_active(&self, actuator: Actuator) -> bool {
        self.get(actuator).is_active()
    }

    /// `(actuator, active)` for every relay in [`Actuator::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Actuator, bool)> + '_ {
        Actuator::ALL.into_iter().map(|a| (a, self.is_active(a)))
    }
}

// ---------------------------------------------------------------------------
// Sensor snapshot
// ---------------------------------------------------------------------------

/// Converted readings from one control cycle. Replaced wholesale every
/// cycle, never patched in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSnapshot {
    pub temperature: TemperatureReading,
    pub ph: PhReading,
    pub tds: TdsReading,
}

// ---------------------------------------------------------------------------
// SystemState
// ---------------------------------------------------------------------------

/// Capacity of the formatted clock text ("12:59:59PM").
pub const CLOCK_TEXT_CAP: usize = 12;

#[derive(Debug, Clone, Default)]
pub struct SystemState {
    /// Latest converted sensor readings.
    pub sensors: SensorSnapshot,
    /// Relay outputs, applied to the hardware at the end of every cycle.
    pub actuators: Actuators,
    /// Accumulated sensor fault bitmask (see [`SensorFault::mask`]).
    pub fault_flags: u8,
    /// Wall-clock time formatted for display.
    pub clock_text: heapless::String<CLOCK_TEXT_CAP>,
}

impl SystemState {
    pub fn has_faults(&self) -> bool {
        self.fault_flags != 0
    }

    pub fn has_fault(&self, fault: SensorFault) -> bool {
        self.fault_flags & fault.mask() != 0
    }
}
