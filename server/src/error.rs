//! Error types for the control server HTTP boundary

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Client-facing request failures
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("no address on file for rover {0}")]
    NoAddress(String),

    #[error("status report must be a JSON object")]
    NotAnObject,

    #[error("invalid or missing API key")]
    Unauthorized,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::NoAddress(_) | ApiError::NotAnObject => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({"ok": false, "error": self.to_string()});
        (self.status(), Json(body)).into_response()
    }
}
