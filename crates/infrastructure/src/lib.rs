//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer on top of SQLite
//! (sqlx), and provides configuration loading and tracing setup.

pub mod config;
pub mod persistence;
pub mod telemetry;

pub use config::{AppConfig, DatabaseConfig, Environment, ServerConfig};
pub use persistence::{
    AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError, SqliteDatabaseHealth,
    SqliteReadingStore,
};
pub use telemetry::{LogFormat, TelemetryError, init_tracing};
