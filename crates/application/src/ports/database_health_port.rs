//! Database health check port
//!
//! Lets the readiness probe ask whether the reading store is reachable
//! without knowing which engine backs it.

use async_trait::async_trait;

use crate::error::ApplicationError;

/// Result of a database health probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHealth {
    /// Whether the probe query succeeded
    pub reachable: bool,
    /// Engine name and version, e.g. "SQLite 3.46.0"
    pub version: Option<String>,
    /// Connections currently held by the pool
    pub pool_size: Option<u32>,
    /// How long the probe took
    pub response_time_ms: Option<u64>,
}

impl DatabaseHealth {
    /// A reachable database reporting its engine version
    #[must_use]
    pub fn reachable(version: impl Into<String>) -> Self {
        Self {
            reachable: true,
            version: Some(version.into()),
            pool_size: None,
            response_time_ms: None,
        }
    }

    /// Attach the probe duration
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }

    /// Attach the pool size
    #[must_use]
    pub const fn with_pool_size(mut self, size: u32) -> Self {
        self.pool_size = Some(size);
        self
    }
}

/// Port for database health checking operations
#[async_trait]
pub trait DatabaseHealthPort: Send + Sync {
    /// Probe the database including engine version and timing
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn DatabaseHealthPort>();
    }

    #[test]
    fn reachable_carries_version() {
        let health = DatabaseHealth::reachable("SQLite 3.46.0");
        assert!(health.reachable);
        assert_eq!(health.version.as_deref(), Some("SQLite 3.46.0"));
    }

    #[test]
    fn builders_attach_metrics() {
        let health = DatabaseHealth::reachable("SQLite")
            .with_response_time(3)
            .with_pool_size(2);
        assert_eq!(health.response_time_ms, Some(3));
        assert_eq!(health.pool_size, Some(2));
    }
}
