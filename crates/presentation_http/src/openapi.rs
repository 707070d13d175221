//! OpenAPI documentation module
//!
//! Serves the OpenAPI 3 description of the station API as JSON.

// Allow clippy warnings from macro-generated code in utoipa derive
#![allow(clippy::needless_for_each)]

use axum::Json;
use utoipa::OpenApi;

use crate::{error, handlers};

/// OpenAPI documentation for the weather station API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Station API",
        description = "Receives form-encoded station uploads, stores them in metric units and serves status and the latest reading"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Liveness and readiness endpoints"),
        (name = "station", description = "Webhook ingestion and reading queries")
    ),
    paths(
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::webhook::receive_webhook,
        handlers::readings::status,
        handlers::readings::latest,
    ),
    components(
        schemas(
            handlers::health::HealthResponse,
            handlers::health::ReadinessResponse,
            handlers::health::DatabaseStatus,
            handlers::webhook::WebhookResponse,
            handlers::readings::StatusResponse,
            error::ProblemDetails,
            error::NotFoundResponse,
        )
    )
)]
#[derive(Debug)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_station_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/webhook", "/api/status", "/api/latest", "/health", "/ready"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn document_serializes() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(json["info"]["title"], "Weather Station API");
        assert!(json["components"]["schemas"]["ProblemDetails"].is_object());
    }
}
