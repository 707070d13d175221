//! Async database connection using sqlx
//!
//! Provides the SQLite pool every store uses. The schema is managed with
//! sqlx's `migrate!()` macro using SQL files in the workspace `migrations/`
//! directory.

use std::{path::Path, str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};
use tracing::{debug, info, instrument};

use crate::config::DatabaseConfig;

/// How long SQLite waits on a locked database before failing a statement
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for async database operations
#[derive(Debug, thiserror::Error)]
pub enum AsyncDatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Configuration for async database connection
#[derive(Debug, Clone)]
pub struct AsyncDatabaseConfig {
    /// Database URL (e.g., "sqlite:weatherstation.db" or "sqlite::memory:")
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to keep open
    pub min_connections: u32,
    /// How long to wait for a free connection
    pub acquire_timeout: Duration,
    /// Enable WAL mode for better concurrency
    pub wal_mode: bool,
}

impl Default for AsyncDatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:weatherstation.db".to_string(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            wal_mode: true,
        }
    }
}

impl From<&DatabaseConfig> for AsyncDatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            acquire_timeout: config.acquire_timeout(),
            ..Default::default()
        }
    }
}

impl AsyncDatabaseConfig {
    /// Create an in-memory database configuration for testing
    ///
    /// Every connection to `sqlite::memory:` opens its own empty database, so
    /// the pool is pinned to a single connection.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            wal_mode: false, // Not supported for in-memory
            ..Default::default()
        }
    }

    /// Create a file-based database configuration
    #[must_use]
    pub fn file(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().display().to_string();
        Self {
            url: format!("sqlite:{path_str}"),
            ..Default::default()
        }
    }

    fn is_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// Async database connection pool
#[derive(Debug, Clone)]
pub struct AsyncDatabase {
    pool: SqlitePool,
}

impl AsyncDatabase {
    /// Create a new async database connection pool
    ///
    /// The database file is created when missing.
    #[instrument(skip_all, fields(url = %config.url))]
    pub async fn new(config: &AsyncDatabaseConfig) -> Result<Self, AsyncDatabaseError> {
        if config.max_connections == 0 {
            return Err(AsyncDatabaseError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }

        let mut options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        if config.wal_mode && !config.is_memory() {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
            debug!("WAL mode enabled");
        }

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
            .acquire_timeout(config.acquire_timeout);

        // An in-memory database lives only as long as its connection
        if config.is_memory() {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;

        info!(
            max_connections = config.max_connections,
            "Async database pool created"
        );

        Ok(Self { pool })
    }

    /// Create an in-memory database for testing
    pub async fn in_memory() -> Result<Self, AsyncDatabaseError> {
        Self::new(&AsyncDatabaseConfig::in_memory()).await
    }

    /// Get the underlying pool for raw queries
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create or upgrade the schema
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<(), AsyncDatabaseError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_in_memory_database() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        let one: (i64,) = sqlx::query_as("SELECT 1").fetch_one(db.pool()).await.unwrap();
        assert_eq!(one.0, 1);
    }

    #[tokio::test]
    async fn run_migrations() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM weather_readings")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(result.0, 0);
    }

    #[tokio::test]
    async fn timestamp_index_created() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type='index' AND name='idx_weather_readings_timestamp'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        // Running twice should not fail
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn wal_mode_for_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = AsyncDatabaseConfig::file(dir.path().join("wal.db"));
        let db = AsyncDatabase::new(&config).await.unwrap();
        db.migrate().await.unwrap();

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(result.0.to_lowercase(), "wal");

        db.close().await;
    }

    #[tokio::test]
    async fn zero_connections_is_a_config_error() {
        let config = AsyncDatabaseConfig {
            max_connections: 0,
            ..AsyncDatabaseConfig::in_memory()
        };
        let err = AsyncDatabase::new(&config).await.unwrap_err();
        assert!(matches!(err, AsyncDatabaseError::Config(_)));
    }

    #[test]
    fn config_from_app_settings() {
        let settings = DatabaseConfig {
            url: "sqlite:/tmp/station.db".to_string(),
            max_connections: 3,
            acquire_timeout_secs: 9,
            ..DatabaseConfig::default()
        };
        let config = AsyncDatabaseConfig::from(&settings);
        assert_eq!(config.url, "sqlite:/tmp/station.db");
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.acquire_timeout, Duration::from_secs(9));
        assert!(config.wal_mode);
    }
}
