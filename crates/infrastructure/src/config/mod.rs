//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `database`: SQLite database settings
//!
//! Sources are layered: built-in defaults, then an optional TOML file
//! (`config.toml`, or the file named by `WEATHERSTATION_CONFIG`), then
//! `WEATHERSTATION_*` environment variables using `__` for nesting, e.g.
//! `WEATHERSTATION_DATABASE__URL=sqlite:/var/lib/ws.db`.

mod database;
mod server;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::telemetry::LogFormat;
pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "WEATHERSTATION";

/// Environment variable naming an explicit config file
pub const CONFIG_FILE_ENV: &str = "WEATHERSTATION_CONFIG";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Production hides internal error details from HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - verbose error responses
    #[default]
    Development,
    /// Production environment - sanitized error responses
    Production,
}

impl Environment {
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let explicit = std::env::var(CONFIG_FILE_ENV).ok();
        Self::load_from(explicit.as_deref())
    }

    /// Load configuration using `file` instead of the default `config.toml`
    ///
    /// A file named explicitly must exist; the default one is optional.
    pub fn load_from(file: Option<&str>) -> Result<Self, config::ConfigError> {
        let file_source = match file {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("environment", "development")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite:weatherstation.db")?
            // Load from file if exists
            .add_source(file_source)
            // Override with environment variables (e.g., WEATHERSTATION_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "database.url must not be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(config::ConfigError::Message(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.database.query_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "database.query_timeout_secs must be at least 1".to_string(),
            ));
        }
        if let Err(e) = self.server.log_format.parse::<LogFormat>() {
            return Err(config::ConfigError::Message(format!("server.log_format: {e}")));
        }
        Ok(())
    }

    /// Settings that are valid but risky, as human-readable warnings
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.environment.is_production()
            && self.server.cors_enabled
            && self.server.allowed_origins.is_empty()
        {
            warnings.push(
                "CORS allows any origin in production; set server.allowed_origins".to_string(),
            );
        }
        if self.environment.is_production() && self.database.url.contains(":memory:") {
            warnings.push("In-memory database in production; readings are lost on restart".to_string());
        }
        warnings
    }
}
