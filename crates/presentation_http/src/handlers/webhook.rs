//! Station webhook endpoint

use application::FormFields;
use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};

/// Acknowledgement returned for a stored reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebhookResponse {
    /// Always `"success"`
    pub status: String,
    /// Timestamp the reading was stored under
    pub timestamp: DateTime<Utc>,
}

impl WebhookResponse {
    fn success(timestamp: DateTime<Utc>) -> Self {
        Self {
            status: "success".to_string(),
            timestamp,
        }
    }
}

/// Receive one form-encoded station upload
///
/// Every field is optional; malformed values are ignored individually.
#[utoipa::path(
    post,
    path = "/api/webhook",
    tag = "station",
    request_body(
        content_type = "application/x-www-form-urlencoded",
        description = "Station fields such as dateutc, tempf, humidity, baromrelin, windspeedmph"
    ),
    responses(
        (status = 200, description = "Reading stored", body = WebhookResponse),
        (status = 500, description = "Body could not be read or reading could not be stored", body = crate::error::ProblemDetails)
    )
)]
#[instrument(skip_all)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Json<WebhookResponse>, ApiError> {
    let Form(pairs) = form?;
    info!(field_count = pairs.len(), "Received webhook data");
    let fields = FormFields::from_pairs(pairs);

    let (id, reading) = state.station_service.ingest(&fields).await?;
    info!(reading_id = %id, timestamp = %reading.timestamp, "Saved weather reading");

    Ok(Json(WebhookResponse::success(reading.timestamp)))
}
