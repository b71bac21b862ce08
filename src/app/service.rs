//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the controllers, the fault monitor and the shared
//! [`SystemState`]. It exposes a hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!   ClockPort ──▶ │          AppService          │
//! ActuatorPort ◀──│ heater · pump · pH · nutrient │
//!                 └──────────────────────────────┘
//! ```
//!
//! One [`tick`](AppService::tick) runs the whole cycle in a fixed order:
//! sample → convert → faults → heater → clock → pH dose release → pump (pH
//! evaluation on the OFF→ON edge) → nutrient → apply relays.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::clock::{format_clock, placeholder};
use crate::config::ControlConfig;
use crate::control::heater::HeaterController;
use crate::control::nutrient_dosing::{NutrientDecision, NutrientDoseScheduler};
use crate::control::ph_dosing::{PhDecision, PhDoseScheduler};
use crate::control::pump::{PumpController, PumpPhase, PumpTransition};
use crate::display::DisplayStatus;
use crate::safety::FaultMonitor;
use crate::sensors::SensorHub;
use crate::state::SystemState;

use super::commands::AppCommand;
use super::events::{AppEvent, DoseChannel, SkipReason};
use super::ports::{ActuatorPort, ClockPort, ConfigError, ConfigPort, EventSink, SensorPort};
use super::self_test;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all control logic.
pub struct AppService {
    config: ControlConfig,
    sensors: SensorHub,
    faults: FaultMonitor,
    heater: HeaterController,
    pump: PumpController,
    ph: PhDoseScheduler,
    nutrient: NutrientDoseScheduler,
    state: SystemState,
    /// Timestamp of the most recent tick.
    now_ms: u64,
    tick_count: u64,
    config_dirty: bool,
}

impl AppService {
    /// Construct the service. `config` must already be validated; the heater
    /// delay and the pump's initial off period start counting at `now_ms`.
    pub fn new(config: ControlConfig, now_ms: u64) -> Self {
        Self {
            sensors: SensorHub::new(&config),
            faults: FaultMonitor::new(),
            heater: HeaterController::new(now_ms, &config),
            pump: PumpController::new(now_ms, &config),
            ph: PhDoseScheduler::new(),
            nutrient: NutrientDoseScheduler::new(),
            state: SystemState::default(),
            now_ms,
            tick_count: 0,
            config_dirty: false,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Pulse the dosing pumps if the config asks for it.
    pub fn self_test(&self, hw: &mut impl ActuatorPort, delay: &mut impl DelayNs, sink: &mut impl EventSink) {
        if self.config.self_test_on_boot {
            self_test::run(hw, delay, sink);
        }
    }

    /// Burst-fill the pH filter so the first evaluation has a full ring.
    pub fn prime_sensors(&mut self, hw: &mut impl SensorPort, delay: &mut impl DelayNs) {
        self.sensors.prime(hw, delay);
    }

    /// Force every relay off and announce the start.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        sink.emit(&AppEvent::Started);
        info!("AppService started");
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]; this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        let now = clock.now_ms();
        self.now_ms = now;
        self.tick_count += 1;

        // 1. Sample and convert
        self.sensors.sample(now, hw);
        let snapshot = self.sensors.convert(&self.config);
        self.state.sensors = snapshot;

        // 2. Fault monitor
        let prev_faults = self.state.fault_flags;
        let faults = self.faults.evaluate(&snapshot);
        self.state.fault_flags = faults;
        let raised = faults & !prev_faults;
        if raised != 0 {
            warn!("Sensor fault! flags=0b{:08b}", faults);
            sink.emit(&AppEvent::FaultDetected(raised));
        } else if faults == 0 && prev_faults != 0 {
            sink.emit(&AppEvent::FaultCleared);
        }

        // 3. Heater
        if let Some(on) = self.heater.update(
            now,
            &snapshot.temperature,
            self.config.heater_threshold_c,
            &mut self.state.actuators.heater,
        ) {
            sink.emit(&AppEvent::HeaterSwitched { on });
        }

        // 4. Clock text
        self.state.clock_text = match clock.wall_clock() {
            Some(t) => format_clock(&t, self.config.twelve_hour_clock, self.config.display_seconds),
            None => placeholder(),
        };

        // 5. Release a finished pH dose before a pump start can evaluate
        let acts = &mut self.state.actuators;
        if let Some(done) = self.ph.poll(now, &mut acts.ph_up, &mut acts.ph_down) {
            sink.emit(&AppEvent::DoseFinished(done));
        }

        // 6. Pump; a fresh start triggers the pH evaluation
        match self.pump.update(now, &self.config, &mut self.state.actuators.pump) {
            Some(PumpTransition::Started) => {
                sink.emit(&AppEvent::PumpPhaseChanged(PumpPhase::On));
                self.evaluate_ph(now, sink);
            }
            Some(PumpTransition::Stopped) => {
                sink.emit(&AppEvent::PumpPhaseChanged(PumpPhase::Off));
            }
            None => {}
        }

        // 7. Nutrient scheduler
        let acts = &mut self.state.actuators;
        for done in self.nutrient.poll(now, &mut acts.nutrient_a, &mut acts.nutrient_b) {
            sink.emit(&AppEvent::DoseFinished(done));
        }
        if let NutrientDecision::Dosed(request) = self.nutrient.evaluate(
            now,
            &snapshot.tds,
            &self.config,
            &mut acts.nutrient_a,
            &mut acts.nutrient_b,
        ) {
            sink.emit(&AppEvent::DoseStarted(request));
        }

        // 8. Drive the relays
        self.apply_actuators(hw);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (operator menu, serial console, etc.).
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::UpdateConfig(new_config) => match new_config.validate() {
                Ok(()) => {
                    self.sensors.apply_config(&new_config);
                    self.config = new_config;
                    self.mark_config_dirty();
                    sink.emit(&AppEvent::ConfigUpdated);
                    info!("Configuration updated at runtime");
                }
                Err(e) => {
                    warn!("Configuration rejected: {}", e);
                    let reason = match e {
                        ConfigError::ValidationFailed(msg) => msg,
                        _ => "invalid configuration",
                    };
                    sink.emit(&AppEvent::ConfigRejected(reason));
                }
            },
            AppCommand::ReportStatus => {
                sink.emit(&AppEvent::Telemetry(self.display_status()));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Everything the status screen shows, as of the last tick.
    pub fn display_status(&self) -> DisplayStatus {
        let sensors = &self.state.sensors;
        DisplayStatus {
            temperature: sensors.temperature.in_unit(self.config.temperature_unit),
            temperature_unit: self.config.temperature_unit,
            ph: sensors.ph.value(),
            ph_fault: sensors.ph.fault,
            ppm: sensors.tds.ppm(),
            ppm_fault: sensors.tds.fault,
            pump_on: self.pump.phase() == PumpPhase::On,
            pump_countdown: self.pump.countdown(self.now_ms),
            heater_on: self.state.actuators.heater.is_active(),
            clock: self.state.clock_text.clone(),
        }
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Current active fault bitmask (0 = no faults).
    pub fn fault_flags(&self) -> u8 {
        self.state.fault_flags
    }

    // ── Internal ──────────────────────────────────────────────

    fn evaluate_ph(&mut self, now: u64, sink: &mut impl EventSink) {
        let acts = &mut self.state.actuators;
        let decision = self.ph.evaluate(
            now,
            &self.state.sensors.ph,
            &self.config,
            &mut acts.ph_up,
            &mut acts.ph_down,
        );
        let skipped = |reason| AppEvent::DoseSkipped {
            channel: DoseChannel::Ph,
            reason,
        };
        match decision {
            PhDecision::Dosed(request) => sink.emit(&AppEvent::DoseStarted(request)),
            PhDecision::CooldownActive => sink.emit(&skipped(SkipReason::CooldownActive)),
            PhDecision::DoseInFlight => sink.emit(&skipped(SkipReason::DoseInFlight)),
            PhDecision::Withheld => sink.emit(&skipped(SkipReason::SensorFault)),
            PhDecision::InBand => {}
        }
    }

    /// Push every logical relay state through the port.
    fn apply_actuators(&self, hw: &mut impl ActuatorPort) {
        for (actuator, active) in self.state.actuators.iter() {
            hw.set_active(actuator, active);
        }
    }

    // ── Config dirty-flag management ──────────────────────────

    /// Mark the config as modified. Called by `handle_command(UpdateConfig)`.
    pub fn mark_config_dirty(&mut self) {
        self.config_dirty = true;
    }

    /// Persist the running config if it changed since the last save.
    /// Returns `true` if the config was saved.
    pub fn save_config_if_dirty(&mut self, storage: &impl ConfigPort) -> bool {
        if !self.config_dirty {
            return false;
        }
        match storage.save(&self.config) {
            Ok(()) => {
                self.config_dirty = false;
                info!("Config saved");
                true
            }
            Err(e) => {
                warn!("Config save failed: {}", e);
                false
            }
        }
    }

    /// Whether the config has unsaved changes.
    pub fn is_config_dirty(&self) -> bool {
        self.config_dirty
    }
}
