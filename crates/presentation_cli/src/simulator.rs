//! Station traffic simulator
//!
//! Posts synthetic uploads to a running server: a timestamp and an outdoor
//! temperature following a sine wave. The elapsed time since the run started
//! is always passed in explicitly, so payloads are reproducible in tests.

use std::{f64::consts::PI, future::Future, time::Duration};

use chrono::{DateTime, Utc};
use reqwest::Client;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{info, instrument, warn};

/// Layout used for `dateutc`
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Path the station webhook is mounted on
pub const WEBHOOK_PATH: &str = "/api/webhook";

/// Client-side timeout for one upload
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that abort a simulation run
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Invalid wave configuration: {0}")]
    InvalidWave(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Shape of the simulated temperature curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveConfig {
    /// Peak deviation from the baseline in °C
    pub amplitude_c: f64,
    /// Length of one full cycle in seconds
    pub period_secs: f64,
    /// Mean temperature in °C
    pub baseline_c: f64,
    /// Phase shift in degrees
    pub phase_deg: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            amplitude_c: 5.0,
            period_secs: 600.0,
            baseline_c: 20.0,
            phase_deg: 0.0,
        }
    }
}

impl WaveConfig {
    /// Reject a non-positive or non-finite period and non-finite parameters
    pub fn validate(&self) -> Result<(), SimulatorError> {
        if !(self.period_secs.is_finite() && self.period_secs > 0.0) {
            return Err(SimulatorError::InvalidWave(format!(
                "period must be a positive number of seconds, got {}",
                self.period_secs
            )));
        }
        if ![self.amplitude_c, self.baseline_c, self.phase_deg]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(SimulatorError::InvalidWave(
                "amplitude, baseline and phase must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Temperature in °C after `elapsed` time
    #[must_use]
    pub fn temperature_c(&self, elapsed: Duration) -> f64 {
        let phase_rad = self.phase_deg.to_radians();
        let angle = 2.0 * PI * elapsed.as_secs_f64() / self.period_secs + phase_rad;
        self.baseline_c + self.amplitude_c * angle.sin()
    }

    /// Temperature in °F after `elapsed` time
    #[must_use]
    pub fn temperature_f(&self, elapsed: Duration) -> f64 {
        self.temperature_c(elapsed) * 9.0 / 5.0 + 32.0
    }
}

/// Build the form fields for one upload
#[must_use]
pub fn build_payload(
    wave: &WaveConfig,
    elapsed: Duration,
    now: DateTime<Utc>,
) -> Vec<(String, String)> {
    vec![
        ("dateutc".to_string(), now.format(DATE_FORMAT).to_string()),
        (
            "tempf".to_string(),
            format!("{:.1}", wave.temperature_f(elapsed)),
        ),
    ]
}

/// Full webhook URL for a server base URL
#[must_use]
pub fn webhook_url(base_url: &str) -> String {
    format!("{}{WEBHOOK_PATH}", base_url.trim_end_matches('/'))
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The requested number of uploads was sent
    Completed { sent: u64 },
    /// The shutdown signal fired first
    Cancelled { sent: u64 },
}

impl RunOutcome {
    #[must_use]
    pub const fn sent(self) -> u64 {
        match self {
            Self::Completed { sent } | Self::Cancelled { sent } => sent,
        }
    }
}

/// Sends simulated uploads at a fixed interval
#[derive(Debug, Clone)]
pub struct Simulator {
    client: Client,
    url: String,
    interval: Duration,
    count: u64,
    wave: WaveConfig,
}

impl Simulator {
    /// Create a simulator posting to `base_url`
    ///
    /// A `count` of 0 keeps sending until the shutdown signal fires.
    pub fn new(
        base_url: &str,
        interval: Duration,
        count: u64,
        wave: WaveConfig,
    ) -> Result<Self, SimulatorError> {
        wave.validate()?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: webhook_url(base_url),
            interval,
            count,
            wave,
        })
    }

    /// Target webhook URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run until `count` uploads were sent or `shutdown` resolves
    ///
    /// Non-success responses are logged and the run continues; transport
    /// errors abort the run.
    #[instrument(skip(self, shutdown), fields(url = %self.url, count = self.count))]
    pub async fn run(
        &self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<RunOutcome, SimulatorError> {
        tokio::pin!(shutdown);
        let started = Instant::now();
        let mut sent: u64 = 0;

        loop {
            let payload = build_payload(&self.wave, started.elapsed(), Utc::now());

            tokio::select! {
                biased;
                () = &mut shutdown => return Ok(RunOutcome::Cancelled { sent }),
                result = self.send(&payload, sent + 1) => result?,
            }
            sent += 1;

            if self.count > 0 && sent >= self.count {
                info!(sent, "Simulation finished");
                return Ok(RunOutcome::Completed { sent });
            }

            tokio::select! {
                biased;
                () = &mut shutdown => return Ok(RunOutcome::Cancelled { sent }),
                () = sleep(self.interval) => {},
            }
        }
    }

    async fn send(&self, payload: &[(String, String)], iteration: u64) -> Result<(), SimulatorError> {
        info!(iteration, fields = payload.len(), "Sending upload");

        let response = self.client.post(&self.url).form(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            info!(status = status.as_u16(), %body, "Upload accepted");
        } else {
            warn!(status = status.as_u16(), %body, "Upload rejected");
        }
        Ok(())
    }
}
