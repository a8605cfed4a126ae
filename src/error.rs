//! Unified error type.

use http::StatusCode;
use serde::Serialize;

use crate::model::ValidationErrors;
use crate::response::{IntoResponse, Response};
use crate::store::StoreError;

/// Boxed error produced by a request body that fails mid-read.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by roster's fallible operations.
///
/// Client mistakes (400, 404) are expressed as HTTP [`Response`] values, not
/// as `Error`s. This type surfaces everything else: binding a port, reading a
/// body, a malformed JSON payload, a store that stopped answering. Handlers
/// return it through `?` and the application shell turns it into a generic
/// `500`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read request body: {0}")]
    ReadBody(#[source] BoxError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ── JSON error bodies ─────────────────────────────────────────────────────────

/// Wire shape shared by every client-facing error: `{"error": "..."}`, with an
/// optional per-field breakdown for validation failures.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody<'a, F: Serialize = ()> {
    pub error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<F>,
}

/// A JSON error response carrying only a message.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody::<()> { error: message, fields: None };
    match serde_json::to_vec(&body) {
        Ok(bytes) => Response::builder().status(status).json(bytes),
        Err(_) => status.into_response(),
    }
}

/// `400` listing every field that failed validation.
pub(crate) fn validation_failed(errors: &ValidationErrors) -> Response {
    let message = errors.to_string();
    let body = ErrorBody { error: &message, fields: Some(errors) };
    match serde_json::to_vec(&body) {
        Ok(bytes) => Response::builder().status(StatusCode::BAD_REQUEST).json(bytes),
        Err(_) => error_response(StatusCode::BAD_REQUEST, &message),
    }
}

/// `404` for paths no route claims.
pub(crate) fn route_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Route not found")
}

/// `500` with a body that says nothing about what actually failed.
pub(crate) fn internal_error() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_not_found_body() {
        let res = route_not_found();
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(res.body(), br#"{"error":"Route not found"}"#);
    }

    #[test]
    fn internal_error_is_generic() {
        let res = internal_error();
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body(), br#"{"error":"Something went wrong!"}"#);
    }
}
