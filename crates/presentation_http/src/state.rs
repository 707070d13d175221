//! Application state shared across handlers

use std::sync::Arc;

use application::{DatabaseHealthPort, ReadingStorePort, StationService};
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Ingestion and query use cases
    pub station_service: Arc<StationService>,
    /// Database probe for the readiness endpoint
    pub database_health: Arc<dyn DatabaseHealthPort>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the services on top of a reading store and its health probe
    pub fn new(
        store: Arc<dyn ReadingStorePort>,
        database_health: Arc<dyn DatabaseHealthPort>,
        config: AppConfig,
    ) -> Self {
        let station_service =
            StationService::new(store).with_query_timeout(config.database.query_timeout());
        Self {
            station_service: Arc::new(station_service),
            database_health,
            config: Arc::new(config),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("station_service", &self.station_service)
            .field("environment", &self.config.environment)
            .finish_non_exhaustive()
    }
}
