//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (operator menu,
//! serial console, stored-config reload) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use crate::config::ControlConfig;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Replace the running configuration. Validated first; timers already
    /// running keep their durations, later decisions use the new values.
    UpdateConfig(ControlConfig),

    /// Emit a telemetry snapshot now.
    ReportStatus,
}
