use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::error::CmsError;

/// API error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// 404 for a content-detail endpoint, e.g. `not_found("Page")`.
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found.", what))
    }
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Mirrors `message` on 404s, for clients that read `detail`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let detail = (status == StatusCode::NOT_FOUND).then(|| message.clone());
        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            detail,
        });

        (status, body).into_response()
    }
}

impl From<CmsError> for ApiError {
    fn from(err: CmsError) -> Self {
        match err {
            CmsError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CmsError::InvalidLocale { .. }
            | CmsError::Validation(_)
            | CmsError::Import(_)
            | CmsError::Serialization(_) => ApiError::BadRequest(err.to_string()),
            CmsError::PayloadTooLarge { .. } => ApiError::PayloadTooLarge(err.to_string()),
            CmsError::Database(e) => {
                error!("Database error: {}", e);
                ApiError::Internal("Database error".to_string())
            }
        }
    }
}
