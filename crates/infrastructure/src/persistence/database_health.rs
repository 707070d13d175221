//! SQLite database health adapter
//!
//! Implements the `DatabaseHealthPort` on top of the sqlx pool.

use std::time::Instant;

use application::error::ApplicationError;
use application::ports::{DatabaseHealth, DatabaseHealthPort};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument, warn};

use super::error::map_sqlx_error;

/// SQLite database health adapter
#[derive(Debug, Clone)]
pub struct SqliteDatabaseHealth {
    pool: SqlitePool,
}

impl SqliteDatabaseHealth {
    /// Create a new database health adapter with the given connection pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseHealthPort for SqliteDatabaseHealth {
    #[instrument(skip(self))]
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError> {
        let start = Instant::now();

        let probe = async {
            let _: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(&self.pool)
                .await?;
            Ok::<_, sqlx::Error>(version)
        };

        match probe.await {
            Ok(version) => {
                let response_time_ms =
                    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let pool_size = self.pool.size();

                debug!(
                    version = %version,
                    pool_size = pool_size,
                    response_time_ms = response_time_ms,
                    "Database health check passed"
                );

                Ok(DatabaseHealth::reachable(format!("SQLite {version}"))
                    .with_pool_size(pool_size)
                    .with_response_time(response_time_ms))
            },
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                Err(map_sqlx_error(e))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::AsyncDatabase;

    async fn create_test_pool() -> SqlitePool {
        AsyncDatabase::in_memory().await.unwrap().pool().clone()
    }

    #[tokio::test]
    async fn check_health_returns_version_info() {
        let health = SqliteDatabaseHealth::new(create_test_pool().await);

        let db_health = health.check_health().await.unwrap();
        assert!(db_health.reachable);
        assert!(db_health.version.unwrap().starts_with("SQLite 3"));
        assert!(db_health.pool_size.is_some());
        assert!(db_health.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn closed_pool_is_unavailable() {
        let pool = create_test_pool().await;
        pool.close().await;
        let health = SqliteDatabaseHealth::new(pool);

        let err = health.check_health().await.unwrap_err();
        assert!(err.is_storage_failure());
    }
}
