//! HTTP server configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (empty = allow any origin)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Graceful shutdown timeout in seconds
    #[serde(default)]
    pub shutdown_timeout_secs: Option<u64>,

    /// Log format: "json" for structured JSON logs, "text" for human-readable
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Default tracing filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Maximum webhook body size in bytes (default: 64KiB)
    #[serde(default = "default_max_body_size")]
    pub max_body_size_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_filter() -> String {
    "info,sqlx=warn".to_string()
}

const fn default_max_body_size() -> usize {
    64 * 1024
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            allowed_origins: Vec::new(),
            shutdown_timeout_secs: Some(30),
            log_format: default_log_format(),
            log_filter: default_log_filter(),
            max_body_size_bytes: default_max_body_size(),
        }
    }
}
