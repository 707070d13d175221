//! Request ID handling for HTTP request correlation
//!
//! Incoming `X-Request-Id` headers are kept; requests without one get a
//! UUIDv7. The ID is echoed on the response and recorded on the request span
//! so every log line of a request can be correlated.

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::{Span, info_span};
use uuid::Uuid;

/// The header name for the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generates time-ordered UUIDv7 request IDs
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Span for one HTTP request, tagged with its request ID
pub fn request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri().path(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_uuids() {
        let request = Request::new(());
        let id = MakeRequestUuid.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert_eq!(Uuid::parse_str(text).unwrap().get_version_num(), 7);
    }

    #[test]
    fn generated_ids_differ() {
        let request = Request::new(());
        let mut make = MakeRequestUuid;
        let a = make.make_request_id(&request).unwrap();
        let b = make.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }

    #[test]
    fn span_is_created_without_header() {
        let request = Request::builder().uri("/api/status").body(()).unwrap();
        let _span = request_span(&request);
    }
}
