//! Database (SQLite) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// SQLite database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `sqlite:weatherstation.db` or `sqlite::memory:`
    #[serde(default = "default_db_url")]
    pub url: String,

    /// Maximum number of concurrent database connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Whether to run pending migrations on startup (default: true)
    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// How long to wait for a pooled connection
    #[serde(default = "default_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Upper bound on a single store call made by the services
    #[serde(default = "default_timeout_secs")]
    pub query_timeout_secs: u64,
}

fn default_db_url() -> String {
    "sqlite:weatherstation.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_timeout_secs() -> u64 {
    5
}

impl DatabaseConfig {
    #[must_use]
    pub const fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
            run_migrations: true,
            acquire_timeout_secs: default_timeout_secs(),
            query_timeout_secs: default_timeout_secs(),
        }
    }
}
