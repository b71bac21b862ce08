//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (probes, relays, clocks, event sinks, config storage)
//! implement these traits. The [`AppService`](super::service::AppService)
//! consumes them via generics, so the control core never touches hardware
//! directly.
//!
//! - **ConfigPort** implementations MUST validate before persisting.
//! - All port errors are typed; callers handle every variant explicitly.

use chrono::NaiveDateTime;

use crate::config::ControlConfig;
use crate::sensors::adc::AnalogChannel;
use crate::state::Actuator;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain raw probe data.
pub trait SensorPort {
    /// Latest one-wire temperature in °C. `None` when no device answers.
    /// The disconnect sentinel may be passed through as-is.
    fn read_temperature_c(&mut self) -> Option<f32>;

    /// One raw ADC conversion on the given analog input.
    fn read_adc(&mut self, channel: AnalogChannel) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive relays.
pub trait ActuatorPort {
    /// Energise (`true`) or release one relay. Polarity is handled by the
    /// adapter.
    fn set_active(&mut self, actuator: Actuator, active: bool);

    /// Release every relay.
    fn all_off(&mut self) {
        for actuator in Actuator::ALL {
            self.set_active(actuator, false);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// Monotonic milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Wall-clock time from the RTC, if one is fitted and set.
    fn wall_clock(&self) -> Option<NaiveDateTime>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists controller configuration.
///
/// Implementations MUST validate config values before persisting. Invalid
/// ranges are rejected with [`ConfigError::ValidationFailed`], not silently
/// clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`ControlConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<ControlConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &ControlConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations and config parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored or supplied config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::NotFound => Self::Config("config not found"),
            ConfigError::Corrupted => Self::Config("config corrupted"),
            ConfigError::IoError => Self::Config("I/O error"),
        }
    }
}
