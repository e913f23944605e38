//! API error types and JSON error response formatting.
//!
//! Every failure is translated at the request boundary into a status code
//! plus a JSON body with a single `error` field; success bodies never carry
//! one. There is no unstructured failure path.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use bazaar_chat::ChatError;
use bazaar_core::error::BazaarError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid input.
    BadRequest(String),
    /// 404 Not Found - identifier has no matching record.
    NotFound(String),
    /// 500 Internal Server Error - storage or unexpected failure.
    Internal(String),
    /// 502 Bad Gateway - the generation service failed.
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<BazaarError> for ApiError {
    fn from(err: BazaarError) -> Self {
        match err {
            BazaarError::Generator(msg) => ApiError::Upstream(msg),
            // Config problems are the operator's fault, never the caller's.
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyQuery => ApiError::BadRequest("No query provided".to_string()),
            ChatError::Generator(msg) => ApiError::Upstream(msg),
            ChatError::Storage(msg) => ApiError::Internal(msg),
        }
    }
}
