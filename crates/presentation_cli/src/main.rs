//! Weather station simulator CLI
//!
//! Sends synthetic station uploads to a running server until the requested
//! count is reached or Ctrl+C is pressed.

use std::{process::ExitCode, time::Duration};

use clap::Parser;
use infrastructure::{LogFormat, init_tracing};
use presentation_cli::{RunOutcome, Simulator, WaveConfig};
use tokio::signal;
use tracing::{error, info};

/// Weather station traffic generator
#[derive(Debug, Parser)]
#[command(name = "weatherstation-sim")]
#[command(author, version, about = "Posts simulated station uploads to the webhook", long_about = None)]
struct Cli {
    /// Server base URL
    #[arg(short, long, env = "SIM_TARGET_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Seconds between uploads
    #[arg(long, default_value_t = 10)]
    interval_secs: u64,

    /// Number of uploads to send (0 = until Ctrl+C)
    #[arg(short, long, default_value_t = 0)]
    count: u64,

    /// Temperature swing around the baseline in °C
    #[arg(long, default_value_t = 5.0)]
    amplitude_c: f64,

    /// Length of one temperature cycle in seconds
    #[arg(long, default_value_t = 600.0)]
    period_secs: f64,

    /// Mean temperature in °C
    #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
    baseline_c: f64,

    /// Phase shift of the cycle in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    phase_deg: f64,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    const fn wave(&self) -> WaveConfig {
        WaveConfig {
            amplitude_c: self.amplitude_c,
            period_secs: self.period_secs,
            baseline_c: self.baseline_c,
            phase_deg: self.phase_deg,
        }
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

async fn ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Cancellation requested, shutting down");
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(LogFormat::Text, log_filter_from_verbosity(cli.verbose)) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let wave = cli.wave();
    let simulator = match Simulator::new(
        &cli.url,
        Duration::from_secs(cli.interval_secs),
        cli.count,
        wave,
    ) {
        Ok(simulator) => simulator,
        Err(e) => {
            error!(error = %e, "Simulator error");
            return ExitCode::FAILURE;
        },
    };

    info!(
        target_url = simulator.url(),
        interval_secs = cli.interval_secs,
        count = cli.count,
        amplitude_c = wave.amplitude_c,
        period_secs = wave.period_secs,
        baseline_c = wave.baseline_c,
        phase_deg = wave.phase_deg,
        "Station simulator starting, press Ctrl+C to stop"
    );

    match simulator.run(ctrl_c()).await {
        Ok(RunOutcome::Completed { sent }) => {
            info!(sent, "Simulation finished");
            ExitCode::SUCCESS
        },
        Ok(RunOutcome::Cancelled { sent }) => {
            info!(sent, "Simulation canceled");
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!(error = %e, "Simulator error");
            ExitCode::FAILURE
        },
    }
}
