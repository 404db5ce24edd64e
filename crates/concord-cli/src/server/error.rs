//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use concord::ValidationResponse;

/// API error type. Every variant renders as `{"result": <message>}`, the
/// shape clients already parse for successful runs.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client (missing file, empty breed).
    BadRequest(String),
    /// Internal server error.
    Internal(String),
    /// Error from the concord library (schema mismatch, parse failure,
    /// extractor timeout).
    Concord(concord::ConcordError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Concord(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        };

        (status, Json(ValidationResponse::error(message))).into_response()
    }
}

impl From<concord::ConcordError> for ApiError {
    fn from(err: concord::ConcordError) -> Self {
        ApiError::Concord(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Concord(e) => write!(f, "Concord error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
