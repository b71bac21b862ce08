//! Unified error types for the reservoir controller.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they can
//! travel through the fault monitor and the event sink without allocation.
//!
//! Nothing in here ever aborts a control cycle: sensor faults are reported as
//! flags next to a best-effort value, and actuator write failures are logged
//! by the adapter that hit them.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor returned a fault or an implausible value.
    Sensor(SensorFault),
    /// A relay could not be driven.
    Actuator(ActuatorError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// Peripheral or collaborator initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// Sensor faults are accumulated in a bitfield by the
/// [`FaultMonitor`](crate::safety::FaultMonitor) so several can be active at
/// once and each clears independently when its reading recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SensorFault {
    /// Temperature probe disconnected or returned the disconnect sentinel.
    TemperatureUnavailable = 0b0000_0001,
    /// TDS reading above the sanity ceiling.
    TdsOutOfRange = 0b0000_0010,
    /// pH reading outside 0–14.
    PhOutOfRange = 0b0000_0100,
}

impl SensorFault {
    pub const ALL: [Self; 3] = [
        Self::TemperatureUnavailable,
        Self::TdsOutOfRange,
        Self::PhOutOfRange,
    ];

    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemperatureUnavailable => write!(f, "temperature probe unavailable"),
            Self::TdsOutOfRange => write!(f, "TDS above sanity ceiling"),
            Self::PhOutOfRange => write!(f, "pH outside 0-14"),
        }
    }
}

impl From<SensorFault> for Error {
    fn from(e: SensorFault) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
