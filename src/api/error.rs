//! Error types for the HTTP API

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// A crawl request that cannot be run
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The seed is not an absolute http(s) URL
    #[error("Invalid URL format. Must start with http:// or https://")]
    InvalidUrl,

    /// A numeric limit lies outside its accepted range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: i64,
    },
}

/// Error answered to an HTTP client, rendered as `{"detail": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The body is not a well-formed crawl request
    #[error(transparent)]
    Json(#[from] JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Json(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Validation(err) => err.to_string(),
            ApiError::Json(rejection) => rejection.body_text(),
        };
        debug!(%status, %detail, "Rejected request");
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
