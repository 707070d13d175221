//! Health check handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Server is running", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: DatabaseStatus,
}

/// Status of the reading database
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatabaseStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Readiness check - can the server reach its database?
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = ReadinessResponse),
        (status = 503, description = "Database unreachable", body = ReadinessResponse)
    )
)]
#[instrument(skip(state))]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match state.database_health.check_health().await {
        Ok(health) => DatabaseStatus {
            healthy: health.reachable,
            version: health.version,
            response_time_ms: health.response_time_ms,
            pool_size: health.pool_size,
            error: None,
        },
        Err(e) => DatabaseStatus {
            healthy: false,
            version: None,
            response_time_ms: None,
            pool_size: None,
            error: Some(if state.config.environment.is_production() {
                "Database unavailable".to_string()
            } else {
                e.to_string()
            }),
        },
    };

    let ready = database.healthy;
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(ReadinessResponse { ready, database }))
}
