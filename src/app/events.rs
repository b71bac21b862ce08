//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them: log to serial, push to a display, etc.

use crate::control::DoseRequest;
use crate::control::pump::PumpPhase;
use crate::display::DisplayStatus;
use crate::state::Actuator;

/// Which dosing loop an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseChannel {
    Ph,
    Nutrient,
}

/// Why an evaluation did not dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    CooldownActive,
    DoseInFlight,
    SensorFault,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic status snapshot, same content as the status screen.
    Telemetry(DisplayStatus),

    /// The heater relay switched.
    HeaterSwitched { on: bool },

    /// The circulation pump changed phase.
    PumpPhaseChanged(PumpPhase),

    /// A dosing relay was energised.
    DoseStarted(DoseRequest),

    /// A dosing relay was released after its dose time.
    DoseFinished(Actuator),

    /// A dose was due for evaluation but not given.
    DoseSkipped { channel: DoseChannel, reason: SkipReason },

    /// One or more sensor faults were raised (new bits only).
    FaultDetected(u8),

    /// All sensor faults have been cleared.
    FaultCleared,

    /// Self-test pulse on one dosing pump.
    SelfTestPulse(Actuator),

    /// A new configuration was accepted.
    ConfigUpdated,

    /// A configuration update was refused; the old one stays active.
    ConfigRejected(&'static str),

    /// The application service has started.
    Started,
}
