//! Weather station HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::{DatabaseHealthPort, ReadingStorePort};
use infrastructure::{
    AppConfig, AsyncDatabase, AsyncDatabaseConfig, LogFormat, SqliteDatabaseHealth,
    SqliteReadingStore, init_tracing,
};
use presentation_http::{
    create_router, set_expose_internal_errors,
    shutdown::{DrainOutcome, run_with_drain_timeout, shutdown_signal},
    state::AppState,
};
use tokio::{net::TcpListener, sync::Notify};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before tracing, since it selects the log format
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let log_format = config.server.log_format.parse().unwrap_or(LogFormat::Text);
    init_tracing(log_format, &config.server.log_filter)?;

    if let Err(e) = &loaded {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        bind = %config.server.bind_address(),
        database = %config.database.url,
        "Weather station server starting"
    );
    for warning in config.warnings() {
        warn!("{warning}");
    }

    set_expose_internal_errors(!config.environment.is_production());

    // Database
    let database = AsyncDatabase::new(&AsyncDatabaseConfig::from(&config.database)).await?;
    if config.database.run_migrations {
        match database.migrate().await {
            Ok(()) => info!("Database initialized successfully"),
            Err(e) => error!(error = %e, "Error initializing database"),
        }
    }

    let store: Arc<dyn ReadingStorePort> =
        Arc::new(SqliteReadingStore::new(database.pool().clone()));
    let database_health: Arc<dyn DatabaseHealthPort> =
        Arc::new(SqliteDatabaseHealth::new(database.pool().clone()));

    let addr = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let app = create_router(AppState::new(store, database_health, config));

    // Start server
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Server listening");
    info!("API docs: http://{addr}/api/openapi.json");

    let draining = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&draining)))
        .into_future();

    if run_with_drain_timeout(server, draining, shutdown_timeout).await? == DrainOutcome::TimedOut {
        warn!("Connections were closed before finishing");
    }

    database.close().await;
    info!("Server shutdown complete");

    Ok(())
}
