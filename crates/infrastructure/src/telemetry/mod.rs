//! Tracing subscriber setup
//!
//! One global subscriber per process: an `EnvFilter` (where `RUST_LOG` wins
//! over the configured directive) feeding either human-readable or JSON
//! formatted output.

use std::str::FromStr;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, one line per event
    #[default]
    Text,
    /// Structured JSON, one object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(TelemetryError::InvalidFormat(other.to_string())),
        }
    }
}

/// Errors raised while installing the subscriber
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Unknown log format '{0}', expected 'text' or 'json'")]
    InvalidFormat(String),

    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Build the filter, preferring `RUST_LOG` over `default_filter`
pub fn env_filter(default_filter: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(default_filter)?),
    }
}

/// Install the global tracing subscriber
///
/// Fails when a subscriber is already installed.
pub fn init_tracing(format: LogFormat, default_filter: &str) -> Result<(), TelemetryError> {
    let filter = env_filter(default_filter)?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer()).try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()?,
    }
    Ok(())
}
