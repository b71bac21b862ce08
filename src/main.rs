//! Host simulator for the reservoir controller.
//!
//! Runs the real [`AppService`] cycle against a simulated reservoir and a
//! fast-forwarded clock, logging every event and the status screen.
//!
//! ```text
//! hydroctl-sim [CONFIG.json] [--hours N] [--unplug-probe-at MIN]
//! ```
//!
//! Set `RUST_LOG=debug` to see per-cycle decisions and the rendered LCD.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use log::{debug, info};

use hydroctl::adapters::config_store::MemoryConfigStore;
use hydroctl::adapters::log_sink::LogEventSink;
use hydroctl::adapters::sim::{SimClock, SimReservoir};
use hydroctl::app::commands::AppCommand;
use hydroctl::app::ports::{ClockPort, ConfigPort};
use hydroctl::app::service::AppService;
use hydroctl::config::ControlConfig;
use hydroctl::display;
use hydroctl::input::{EncoderCell, EncoderReader};

/// Written by the encoder ISR on the board; idle in the simulator.
static ENCODER: EncoderCell = EncoderCell::new();

/// Simulated time between status reports.
const REPORT_INTERVAL: Duration = Duration::from_secs(5 * 60);

struct SimArgs {
    config_path: Option<String>,
    hours: u32,
    unplug_probe_at_min: Option<u64>,
}

impl SimArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Self {
            config_path: None,
            hours: 6,
            unplug_probe_at_min: None,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--hours" => {
                    let v = args.next().context("--hours needs a value")?;
                    parsed.hours = v.parse().with_context(|| format!("bad --hours value {v:?}"))?;
                }
                "--unplug-probe-at" => {
                    let v = args.next().context("--unplug-probe-at needs a value")?;
                    let min = v.parse().with_context(|| format!("bad --unplug-probe-at value {v:?}"))?;
                    parsed.unplug_probe_at_min = Some(min);
                }
                flag if flag.starts_with("--") => bail!("unknown option {flag}"),
                path => parsed.config_path = Some(path.to_owned()),
            }
        }
        Ok(parsed)
    }
}

fn load_config(args: &SimArgs, store: &MemoryConfigStore) -> Result<ControlConfig> {
    let config = match &args.config_path {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            ControlConfig::from_json(&json).with_context(|| format!("loading {path}"))?
        }
        None => store.load().context("loading stored config")?,
    };
    store.save(&config).context("persisting config")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = SimArgs::parse(std::env::args().skip(1))?;
    let store = MemoryConfigStore::new();
    let config = load_config(&args, &store)?;
    info!("hydroctl simulator, {} simulated hours", args.hours);

    let epoch = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(6, 0, 0))
        .context("simulation epoch")?;
    let mut clock = SimClock::new(epoch);
    let mut reservoir = SimReservoir::new(&config, 19.5, 6.9, 310.0);
    let mut sink = LogEventSink::new();

    for row in display::splash() {
        debug!("LCD | {row}");
    }

    let mut app = AppService::new(config.clone(), clock.now_ms());
    app.self_test(&mut reservoir, &mut clock, &mut sink);
    app.prime_sensors(&mut reservoir, &mut clock);
    app.start(&mut reservoir, &mut sink);

    let step = Duration::from_millis(u64::from(config.control_loop_interval_ms));
    let end_ms = clock.now_ms() + u64::from(args.hours) * 3_600_000;
    let unplug_at_ms = args.unplug_probe_at_min.map(|m| clock.now_ms() + m * 60_000);
    let mut encoder = EncoderReader::new();
    let mut next_report_ms = clock.now_ms();

    while clock.now_ms() < end_ms {
        clock.advance(step);
        reservoir.step(step);
        if unplug_at_ms.is_some_and(|t| clock.now_ms() >= t) && !reservoir.probe_disconnected {
            info!("Simulation: temperature probe unplugged");
            reservoir.probe_disconnected = true;
        }

        app.tick(&mut reservoir, &clock, &mut sink);

        for event in encoder.poll(&ENCODER) {
            info!("Encoder {:?}", event);
        }

        if clock.now_ms() >= next_report_ms {
            next_report_ms += REPORT_INTERVAL.as_millis() as u64;
            app.handle_command(AppCommand::ReportStatus, &mut sink);
            for row in app.display_status().render() {
                debug!("LCD | {row}");
            }
        }
        app.save_config_if_dirty(&store);
    }

    info!(
        "Simulation done after {} cycles: T={:.1} °C pH={:.2} TDS={:.0} ppm",
        app.tick_count(),
        reservoir.temperature_c,
        reservoir.ph,
        reservoir.ppm
    );
    Ok(())
}
