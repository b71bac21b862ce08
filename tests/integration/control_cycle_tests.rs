//! Integration tests for the full control cycle:
//! probes → filters → controllers → relays, driven through mock ports.

use chrono::NaiveDate;

use hydroctl::app::events::{AppEvent, DoseChannel, SkipReason};
use hydroctl::app::service::AppService;
use hydroctl::config::ControlConfig;
use hydroctl::control::pump::PumpPhase;
use hydroctl::error::SensorFault;
use hydroctl::state::Actuator;

use super::mock_hw::{LogSink, MockClock, MockHardware};

const STEP_MS: u64 = 100;

struct Rig {
    app: AppService,
    hw: MockHardware,
    clock: MockClock,
    sink: LogSink,
}

impl Rig {
    fn new(config: ControlConfig, ph: f32, ppm: f32) -> Self {
        let mut hw = MockHardware::with_water(&config, ph, ppm);
        let mut sink = LogSink::new();
        let mut app = AppService::new(config, 0);
        app.start(&mut hw, &mut sink);
        Self {
            app,
            hw,
            clock: MockClock::new(),
            sink,
        }
    }

    fn tick(&mut self) {
        self.clock.now_ms += STEP_MS;
        self.app.tick(&mut self.hw, &self.clock, &mut self.sink);
    }

    fn run_until(&mut self, until_ms: u64) {
        while self.clock.now_ms < until_ms {
            self.tick();
        }
    }

    fn dose_started(&self, target: Actuator) -> usize {
        self.sink
            .count(|e| matches!(e, AppEvent::DoseStarted(r) if r.target == target))
    }
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_releases_every_relay() {
    let rig = Rig::new(ControlConfig::default(), 6.2, 450.0);
    assert_eq!(rig.hw.calls.len(), Actuator::COUNT);
    assert!(rig.hw.calls.iter().all(|c| !c.active));
    assert_eq!(rig.sink.events, vec![AppEvent::Started]);
}

#[test]
fn self_test_and_priming_consume_delay_time() {
    let cfg = ControlConfig::default();
    let mut hw = MockHardware::with_water(&cfg, 6.2, 450.0);
    let mut clock = MockClock::new();
    let mut sink = LogSink::new();
    let mut app = AppService::new(cfg, 0);

    app.self_test(&mut hw, &mut clock, &mut sink);
    assert_eq!(clock.now_ms, 8_000);
    assert_eq!(hw.activations(Actuator::PhUp), 1);
    assert_eq!(hw.activations(Actuator::NutrientB), 1);
    assert_eq!(hw.activations(Actuator::Heater), 0);

    app.prime_sensors(&mut hw, &mut clock);
    assert_eq!(clock.now_ms, 8_000 + 9 * 30);
}

#[test]
fn self_test_skipped_when_disabled() {
    let cfg = ControlConfig {
        self_test_on_boot: false,
        ..ControlConfig::default()
    };
    let mut hw = MockHardware::new();
    let mut clock = MockClock::new();
    let mut sink = LogSink::new();
    AppService::new(cfg, 0).self_test(&mut hw, &mut clock, &mut sink);
    assert!(hw.calls.is_empty());
    assert_eq!(clock.now_ms, 0);
}

// ── Pump and pH ───────────────────────────────────────────────

#[test]
fn pump_start_triggers_ph_dose_then_cooldown() {
    let mut rig = Rig::new(ControlConfig::default(), 5.9, 450.0);

    rig.run_until(29_900);
    assert!(!rig.hw.is_on(Actuator::Pump));
    assert!(!rig.hw.is_on(Actuator::PhUp));

    rig.run_until(30_000);
    assert!(rig.hw.is_on(Actuator::Pump));
    assert!(rig.hw.is_on(Actuator::PhUp));
    assert!(!rig.hw.is_on(Actuator::PhDown));
    assert!(rig.sink.events.contains(&AppEvent::PumpPhaseChanged(PumpPhase::On)));
    assert_eq!(rig.dose_started(Actuator::PhUp), 1);

    rig.run_until(32_900);
    assert!(rig.hw.is_on(Actuator::PhUp));
    rig.run_until(33_000);
    assert!(!rig.hw.is_on(Actuator::PhUp));
    assert!(rig.sink.events.contains(&AppEvent::DoseFinished(Actuator::PhUp)));

    rig.run_until(60_000);
    assert!(!rig.hw.is_on(Actuator::Pump));
    assert!(rig.sink.events.contains(&AppEvent::PumpPhaseChanged(PumpPhase::Off)));

    // Next pump start lands inside the 60 min cooldown.
    rig.run_until(180_000);
    assert!(rig.hw.is_on(Actuator::Pump));
    assert!(rig.sink.events.contains(&AppEvent::DoseSkipped {
        channel: DoseChannel::Ph,
        reason: SkipReason::CooldownActive,
    }));
    assert_eq!(rig.hw.activations(Actuator::PhUp), 1);
}

#[test]
fn dose_ending_on_pump_start_does_not_block_next_dose() {
    let cfg = ControlConfig {
        ph_cooldown_minutes: 0.0,
        ph_dose_seconds: 150.0,
        ..ControlConfig::default()
    };
    let mut rig = Rig::new(cfg, 5.0, 450.0);

    rig.run_until(30_000);
    assert_eq!(rig.dose_started(Actuator::PhUp), 1);

    // Dose timer and off period both run out at 180 s.
    rig.run_until(180_000);
    assert!(rig.sink.events.contains(&AppEvent::DoseFinished(Actuator::PhUp)));
    assert_eq!(rig.dose_started(Actuator::PhUp), 2);
    assert!(!rig.sink.events.contains(&AppEvent::DoseSkipped {
        channel: DoseChannel::Ph,
        reason: SkipReason::DoseInFlight,
    }));
    assert!(rig.hw.is_on(Actuator::PhUp));
}

#[test]
fn ph_evaluated_only_on_pump_start() {
    let mut rig = Rig::new(ControlConfig::default(), 6.2, 450.0);
    rig.run_until(31_000);
    assert!(rig.hw.is_on(Actuator::Pump));

    // Chemistry drifts mid-run; nothing happens until the next start.
    let cfg = rig.app.config().clone();
    rig.hw.set_ph(&cfg, 7.5);
    rig.run_until(179_900);
    assert_eq!(rig.hw.activations(Actuator::PhDown), 0);

    rig.run_until(180_000);
    assert!(rig.hw.is_on(Actuator::PhDown));
    assert!(!rig.hw.is_on(Actuator::PhUp));
}

#[test]
fn ph_fault_withholds_dose() {
    let mut rig = Rig::new(ControlConfig::default(), 6.2, 450.0);
    rig.hw.ph_raw = 0; // floating input reads ~21 pH
    rig.run_until(30_000);

    assert!(rig.app.state().has_fault(SensorFault::PhOutOfRange));
    assert!(rig.sink.events.contains(&AppEvent::DoseSkipped {
        channel: DoseChannel::Ph,
        reason: SkipReason::SensorFault,
    }));
    assert!(!rig.hw.is_on(Actuator::PhUp));
    assert!(!rig.hw.is_on(Actuator::PhDown));
}

// ── Heater ────────────────────────────────────────────────────

#[test]
fn heater_waits_for_delay_and_fails_safe() {
    let mut rig = Rig::new(ControlConfig::default(), 6.2, 450.0);
    rig.hw.temperature_c = Some(20.0);

    rig.run_until(29_900);
    assert!(!rig.hw.is_on(Actuator::Heater));
    rig.run_until(30_000);
    assert!(rig.hw.is_on(Actuator::Heater));
    assert!(rig.sink.events.contains(&AppEvent::HeaterSwitched { on: true }));

    rig.hw.temperature_c = None;
    rig.tick();
    assert!(!rig.hw.is_on(Actuator::Heater));
    assert!(
        rig.sink
            .events
            .contains(&AppEvent::FaultDetected(SensorFault::TemperatureUnavailable.mask()))
    );

    rig.hw.temperature_c = Some(26.0);
    rig.tick();
    assert!(!rig.hw.is_on(Actuator::Heater));
    assert_eq!(rig.sink.events.last(), Some(&AppEvent::FaultCleared));
}

// ── Nutrients ─────────────────────────────────────────────────

#[test]
fn nutrient_parts_alternate_and_never_overlap() {
    let cfg = ControlConfig {
        ppm_cooldown_minutes: 0.0,
        ..ControlConfig::default()
    };
    let mut rig = Rig::new(cfg, 6.2, 300.0);

    while rig.clock.now_ms < 20_000 {
        rig.tick();
        assert!(
            !(rig.hw.is_on(Actuator::NutrientA) && rig.hw.is_on(Actuator::NutrientB)),
            "A and B both on at {} ms",
            rig.clock.now_ms
        );
    }

    let order: Vec<Actuator> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::DoseStarted(r) if matches!(r.target, Actuator::NutrientA | Actuator::NutrientB) => {
                Some(r.target)
            }
            _ => None,
        })
        .collect();
    assert!(order.len() >= 4, "{order:?}");
    for pair in order.chunks(2) {
        assert_eq!(pair[0], Actuator::NutrientA);
        if let Some(&b) = pair.get(1) {
            assert_eq!(b, Actuator::NutrientB);
        }
    }
}

#[test]
fn nutrient_cooldown_spaces_parts() {
    let mut rig = Rig::new(ControlConfig::default(), 6.2, 300.0);
    rig.run_until(100);
    assert!(rig.hw.is_on(Actuator::NutrientA));

    rig.run_until(3_599_900);
    assert_eq!(rig.dose_started(Actuator::NutrientB), 0);
    rig.run_until(3_600_100);
    assert_eq!(rig.dose_started(Actuator::NutrientB), 1);
    assert_eq!(rig.dose_started(Actuator::NutrientA), 1);
}

#[test]
fn tds_over_ceiling_is_flagged() {
    let mut rig = Rig::new(ControlConfig::default(), 6.2, 450.0);
    rig.hw.tds_raw = 4095;
    rig.run_until(5_000);

    assert!(rig.app.state().has_fault(SensorFault::TdsOutOfRange));
    let status = rig.app.display_status();
    assert!(status.ppm_fault);
    assert_eq!(status.render()[1].as_str(), "TDS: (error)");
    assert_eq!(rig.dose_started(Actuator::NutrientA), 0);
}

// ── Relays and display ────────────────────────────────────────

#[test]
fn hardware_mirrors_logical_state_every_cycle() {
    let cfg = ControlConfig {
        ppm_cooldown_minutes: 0.0,
        ..ControlConfig::default()
    };
    let mut rig = Rig::new(cfg, 5.5, 300.0);
    rig.hw.temperature_c = Some(18.0);
    while rig.clock.now_ms < 65_000 {
        rig.tick();
        for (actuator, active) in rig.app.state().actuators.iter() {
            assert_eq!(rig.hw.is_on(actuator), active, "{actuator} at {} ms", rig.clock.now_ms);
        }
    }
}

#[test]
fn display_status_reflects_cycle() {
    let mut rig = Rig::new(ControlConfig::default(), 6.2, 450.0);
    rig.clock.wall = NaiveDate::from_ymd_opt(2024, 6, 1).and_then(|d| d.and_hms_opt(19, 5, 0));
    rig.hw.temperature_c = Some(20.0);
    rig.run_until(35_000);

    let status = rig.app.display_status();
    assert_eq!(status.clock.as_str(), "7:05PM");
    assert!(status.pump_on);
    assert_eq!((status.pump_countdown.minutes, status.pump_countdown.seconds), (0, 25));
    assert!(status.heater_on);
    assert!((status.ph - 6.2).abs() < 0.02);

    let rows = status.render();
    assert!(rows[0].ends_with("7:05PM"));
    assert!(rows[2].ends_with("(H)"));
    assert!(rows[3].starts_with("PMP: ON "));
}

#[test]
fn missing_wall_clock_shows_placeholder() {
    let mut rig = Rig::new(ControlConfig::default(), 6.2, 450.0);
    rig.tick();
    assert_eq!(rig.app.state().clock_text.as_str(), "--:--");
}
