//! API error type with IntoResponse
//!
//! Manager errors are converted to JSON responses with a status picked from
//! the error kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::Error;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Malformed path or body (400)
    BadRequest { message: String },

    /// Referenced entity absent (404)
    NotFound { message: String },

    /// Name already taken (409)
    Conflict { message: String },

    /// Storage or encoding failure (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest { message } => json!({
                "error": "bad_request",
                "message": message
            }),
            Self::NotFound { message } => json!({
                "error": "not_found",
                "message": message
            }),
            Self::Conflict { message } => json!({
                "error": "duplicate",
                "message": message
            }),
            Self::Internal { message } => {
                // Log the actual error, return generic message
                tracing::error!("internal error: {}", message);
                json!({
                    "error": "internal_error",
                    "message": "an internal error occurred"
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let message = e.to_string();
        // A composite write answers with the status of the step that failed.
        match e.root() {
            Error::NotFound { .. } => Self::NotFound { message },
            Error::Duplicate { .. } => Self::Conflict { message },
            _ => Self::Internal { message },
        }
    }
}
