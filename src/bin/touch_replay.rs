//! Touch replay
//!
//! Drives the touch monitor against the simulated host and prints one JSON
//! tick report per line.
//!
//! # Usage
//!
//! ```bash
//! # Touch in the response window after 20 ticks
//! touch-replay --state 47 --step-at 20 --touch 0.3
//!
//! # Jittery baseline with a custom configuration
//! touch-replay --config touch.toml --jitter 0.002 --seed 9 --ticks 500
//! ```

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use touch_core::hal::simulator::{SimulatedHost, VoltageSource};
use touch_core::{ConfigLoader, ProtocolHooks, StateId, TouchMonitor};

/// Replay a scripted sensor trace through the touch monitor
#[derive(Parser, Debug)]
#[command(name = "touch-replay")]
#[command(
    author,
    version,
    about = "Replay scripted whisker-sensor traces through the touch monitor",
    long_about = None
)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Configuration file (TOML); defaults and TOUCH__* variables apply on top
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value = "100")]
    ticks: u64,

    /// Machine state the simulated host starts in
    #[arg(short, long, default_value = "47")]
    state: u32,

    /// Tick at which sensor 1 steps from baseline to touch voltage
    #[arg(long, default_value = "50")]
    step_at: u64,

    /// Sensor 1 voltage before the step
    #[arg(long, default_value = "0.0")]
    baseline: f64,

    /// Sensor 1 voltage after the step
    #[arg(long, default_value = "0.25")]
    touch: f64,

    /// Uniform jitter added to sensor 2 (volts)
    #[arg(long, default_value = "0.0", value_parser = finite_amplitude)]
    jitter: f64,

    /// Seed for the jitter generator
    #[arg(long, default_value = "0")]
    seed: u64,
}

/// Jitter amplitudes must be finite for the uniform sampler
fn finite_amplitude(arg: &str) -> Result<f64, String> {
    let value: f64 = arg.parse().map_err(|e| format!("{}", e))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("jitter amplitude must be finite, got {}", value))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("{} v{}", touch_core::NAME, touch_core::VERSION);

    let mut loader = match &cli.config {
        Some(path) => ConfigLoader::with_paths(vec![path.clone()]),
        None => ConfigLoader::new(),
    };
    let config = loader.load_monitor_config()?;
    let (sensor1, sensor2) = (config.channels.sensor1, config.channels.sensor2);
    let mut monitor = TouchMonitor::new(config)?;

    let mut host = SimulatedHost::with_seed(StateId(cli.state), cli.seed)
        .with_channel(
            sensor1,
            VoltageSource::Step {
                at_tick: cli.step_at,
                before: cli.baseline,
                after: cli.touch,
            },
        )
        .with_channel(
            sensor2,
            VoltageSource::Jitter {
                base: 0.0,
                amplitude: cli.jitter,
            },
        );

    monitor.init(&mut host);
    monitor.start_trial(&mut host);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for _ in 0..cli.ticks {
        let report = monitor.tick(&mut host);
        serde_json::to_writer(&mut out, &report)?;
        writeln!(out)?;
    }

    info!(
        ticks = monitor.ticks(),
        final_state = host.state().0,
        jumps = host.jumps().len(),
        "replay finished"
    );
    Ok(())
}
