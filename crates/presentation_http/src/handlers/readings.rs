//! Status and latest-reading endpoints

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use domain::StoredReading;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use application::StationStatus;

use crate::{error::ApiError, state::AppState};

/// Service status response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Always `"healthy"` when the store answered
    pub status: String,
    /// Number of stored readings
    pub total_readings: u64,
    /// Timestamp of the most recent reading
    pub last_reading: Option<DateTime<Utc>>,
    /// Uptime as `d.hh:mm:ss`
    pub uptime: String,
    /// Uptime in whole seconds
    pub uptime_seconds: u64,
}

impl From<StationStatus> for StatusResponse {
    fn from(status: StationStatus) -> Self {
        Self {
            status: "healthy".to_string(),
            total_readings: status.total_readings,
            last_reading: status.last_reading_at,
            uptime: status.uptime_display(),
            uptime_seconds: status.uptime.as_secs(),
        }
    }
}

/// Reading count, last reading time and uptime
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "station",
    responses(
        (status = 200, description = "Store reachable", body = StatusResponse),
        (status = 500, description = "Store unreachable", body = crate::error::ProblemDetails)
    )
)]
#[instrument(skip(state))]
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let status = state.station_service.status().await?;
    Ok(Json(status.into()))
}

/// The most recent reading
#[utoipa::path(
    get,
    path = "/api/latest",
    tag = "station",
    responses(
        (status = 200, description = "Most recent reading in metric units", body = serde_json::Value),
        (status = 404, description = "No readings stored yet", body = crate::error::NotFoundResponse),
        (status = 500, description = "Store unreachable", body = crate::error::ProblemDetails)
    )
)]
#[instrument(skip(state))]
pub async fn latest(State(state): State<AppState>) -> Result<Json<StoredReading>, ApiError> {
    let reading = state.station_service.latest_reading().await?;
    Ok(Json(reading))
}
