//! Route definitions

use axum::{
    Router,
    body::Body,
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    handlers,
    middleware::{MakeRequestUuid, REQUEST_ID_HEADER, request_span},
    openapi,
    state::AppState,
};

/// Create the main router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let server = state.config.server.clone();

    let mut router = Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Station API
        .route("/api/webhook", post(handlers::webhook::receive_webhook))
        .route("/api/status", get(handlers::readings::status))
        .route("/api/latest", get(handlers::readings::latest))
        // API documentation
        .route("/api/openapi.json", get(openapi::openapi_json))
        .layer(RequestBodyLimitLayer::new(server.max_body_size_bytes));

    if server.cors_enabled {
        router = router.layer(cors_layer(&server));
    }

    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    // Order matters: the request ID is set before the trace span reads it
    router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id_header.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
                .layer(PropagateRequestIdLayer::new(request_id_header)),
        )
        .with_state(state)
}

/// CORS policy: any origin when none are configured, otherwise the listed ones
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
