use crate::{
    models::dto::FieldViolation,
    services::{drone_service::DroneError, upload_service::UploadError},
};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub violations: Vec<FieldViolation>,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            violations: Vec::new(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// 400 carrying every rejected field; the first one becomes the message.
    pub fn invalid_fields(violations: Vec<FieldViolation>) -> Self {
        let message = violations
            .first()
            .map(|v| v.message.clone())
            .unwrap_or_else(|| "Invalid request body.".into());
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
            violations,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.message,
            "status": self.status.as_u16()
        });
        if !self.violations.is_empty() {
            body["violations"] = json!(self.violations);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<DroneError> for AppError {
    fn from(err: DroneError) -> Self {
        match err {
            DroneError::NotFound(_) => AppError::not_found("Drone id not found."),
            DroneError::NameNotFound(_) => AppError::not_found("Drone name not found."),
            DroneError::Store(err) => {
                tracing::error!("drone store failure: {}", err);
                AppError::internal(err.to_string())
            }
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::MissingVideo | UploadError::InvalidFilename(_) => {
                AppError::bad_request(err.to_string())
            }
            UploadError::NotFound(_) => AppError::not_found("Video not found."),
            UploadError::Io(_) => {
                tracing::error!("video storage failure: {}", err);
                AppError::internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}
