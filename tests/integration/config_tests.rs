//! Integration tests for configuration: JSON loading, the postcard store and
//! runtime updates through the service.

use hydroctl::adapters::config_store::MemoryConfigStore;
use hydroctl::app::commands::AppCommand;
use hydroctl::app::events::AppEvent;
use hydroctl::app::ports::{ConfigError, ConfigPort};
use hydroctl::app::service::AppService;
use hydroctl::config::{ControlConfig, TemperatureUnit};
use hydroctl::state::Actuator;

use super::mock_hw::{LogSink, MockClock, MockHardware};

#[test]
fn json_overrides_merge_with_defaults() {
    let cfg = ControlConfig::from_json(
        r#"{ "temperature_unit": "Fahrenheit", "ph_setpoint": 5.8, "ppm_setpoint": 700.0 }"#,
    )
    .unwrap();
    assert_eq!(cfg.temperature_unit, TemperatureUnit::Fahrenheit);
    assert_eq!(cfg.ph_setpoint, 5.8);
    assert_eq!(cfg.ppm_setpoint, 700.0);
    assert_eq!(cfg.pump_off_minutes, ControlConfig::default().pump_off_minutes);
}

#[test]
fn json_with_negative_tolerance_is_rejected() {
    let err = ControlConfig::from_json(r#"{ "ph_tolerance": -0.1 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed(_)));
}

#[test]
fn service_persists_accepted_update() {
    let store = MemoryConfigStore::new();
    let mut app = AppService::new(store.load().unwrap(), 0);
    let mut sink = LogSink::new();

    let new_cfg = ControlConfig {
        heater_threshold_c: 22.5,
        ..ControlConfig::default()
    };
    app.handle_command(AppCommand::UpdateConfig(new_cfg.clone()), &mut sink);
    assert_eq!(sink.events, vec![AppEvent::ConfigUpdated]);
    assert!(app.save_config_if_dirty(&store));
    assert!(!app.save_config_if_dirty(&store));
    assert_eq!(store.load().unwrap(), new_cfg);
}

#[test]
fn rejected_update_leaves_store_untouched() {
    let store = MemoryConfigStore::new();
    let mut app = AppService::new(ControlConfig::default(), 0);
    let mut sink = LogSink::new();

    let bad = ControlConfig {
        pump_on_minutes: 0.0,
        ..ControlConfig::default()
    };
    app.handle_command(AppCommand::UpdateConfig(bad), &mut sink);
    assert!(matches!(sink.events.as_slice(), [AppEvent::ConfigRejected(_)]));
    assert!(!app.save_config_if_dirty(&store));
    assert_eq!(store.stored_len(), None);
}

#[test]
fn runtime_threshold_change_applies_to_next_decision() {
    let cfg = ControlConfig {
        heater_delay_minutes: 0.0,
        ..ControlConfig::default()
    };
    let mut hw = MockHardware::with_water(&cfg, 6.2, 450.0);
    hw.temperature_c = Some(23.0);
    let mut clock = MockClock::new();
    let mut sink = LogSink::new();
    let mut app = AppService::new(cfg.clone(), 0);
    app.start(&mut hw, &mut sink);

    clock.now_ms = 100;
    app.tick(&mut hw, &clock, &mut sink);
    assert!(hw.is_on(Actuator::Heater));

    app.handle_command(
        AppCommand::UpdateConfig(ControlConfig {
            heater_threshold_c: 22.0,
            ..cfg
        }),
        &mut sink,
    );
    clock.now_ms = 200;
    app.tick(&mut hw, &clock, &mut sink);
    assert!(!hw.is_on(Actuator::Heater));
}

#[test]
fn report_status_emits_telemetry_in_configured_unit() {
    let cfg = ControlConfig {
        temperature_unit: TemperatureUnit::Fahrenheit,
        ..ControlConfig::default()
    };
    let mut hw = MockHardware::with_water(&cfg, 6.2, 450.0);
    hw.temperature_c = Some(25.0);
    let mut clock = MockClock::new();
    let mut sink = LogSink::new();
    let mut app = AppService::new(cfg, 0);

    clock.now_ms = 100;
    app.tick(&mut hw, &clock, &mut sink);
    app.handle_command(AppCommand::ReportStatus, &mut sink);

    let Some(AppEvent::Telemetry(status)) = sink.events.last() else {
        panic!("expected telemetry, got {:?}", sink.events.last());
    };
    assert_eq!(status.temperature, Some(77.0));
    assert_eq!(status.temperature_unit, TemperatureUnit::Fahrenheit);
}
