//! API error handling
//!
//! Failures are rendered as RFC 9457 problem details
//! (`application/problem+json`). A missing reading is the one exception: it
//! answers 404 with a plain `{"message": ...}` body. In production mode the
//! `detail` member is withheld so storage errors do not leak internals.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    extract::rejection::FormRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Content type for problem detail responses
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details should be exposed in responses.
///
/// Set to `false` in production.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Problem detail body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    /// URI identifying the problem type
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short summary of the problem type
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Explanation of this occurrence, omitted in production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProblemDetails {
    /// Problem body for `status`, with `detail` subject to the exposure switch
    #[must_use]
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        let (problem_type, title) = match status {
            StatusCode::BAD_REQUEST => (
                "https://tools.ietf.org/html/rfc9110#section-15.5.1",
                "Bad Request",
            ),
            _ => (
                "https://tools.ietf.org/html/rfc9110#section-15.6.1",
                "An error occurred while processing your request.",
            ),
        };

        Self {
            problem_type: problem_type.to_string(),
            title: title.to_string(),
            status: status.as_u16(),
            detail: should_expose_details().then(|| detail.into()),
        }
    }
}

/// Body of a 404 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NotFoundResponse {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::NotFound(message) => {
                debug!(%message, "Resource not found");
                return (StatusCode::NOT_FOUND, Json(NotFoundResponse { message }))
                    .into_response();
            },
            Self::BadRequest(msg) => {
                debug!(error = %msg, "Rejected request");
                (StatusCode::BAD_REQUEST, msg)
            },
            Self::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            },
        };

        (
            status,
            [(header::CONTENT_TYPE, PROBLEM_JSON)],
            Json(ProblemDetails::new(status, detail)),
        )
            .into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            err @ ApplicationError::Storage(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::Internal(format!("Failed to read form data: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failure_maps_to_internal() {
        let err: ApiError = ApplicationError::storage("database is locked").into();
        assert!(matches!(err, ApiError::Internal(ref msg) if msg.contains("database is locked")));
    }

    #[test]
    fn not_found_keeps_message() {
        let err: ApiError = ApplicationError::NotFound("No weather readings found".into()).into();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "No weather readings found"));
    }

    #[test]
    fn domain_error_maps_to_bad_request() {
        let source = ApplicationError::Domain(domain::DomainError::InvalidReadingId(0));
        assert!(matches!(ApiError::from(source), ApiError::BadRequest(_)));
    }

    #[test]
    fn internal_problem_uses_generic_title() {
        let problem = ProblemDetails::new(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(problem.status, 500);
        assert_eq!(problem.title, "An error occurred while processing your request.");
        assert!(problem.problem_type.ends_with("section-15.6.1"));
    }

    #[test]
    fn problem_serializes_type_member() {
        let problem = ProblemDetails {
            problem_type: "about:blank".to_string(),
            title: "t".to_string(),
            status: 500,
            detail: None,
        };
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["type"], "about:blank");
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn internal_error_response_is_problem_json() {
        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_JSON
        );
    }

    #[test]
    fn not_found_response_is_plain_json() {
        let response = ApiError::NotFound("gone".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
