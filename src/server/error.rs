//! HTTP error responses
//!
//! Every error leaves the server as `{"error": message}` with a matching status code,
//! including rejected form and multipart bodies.

use crate::api::VideoSummaryError;
use crate::error::BrieflyError;
use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Handler result type
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    /// Failure whose message is safe to show
    Failed(String),
    /// Failure whose details stay in the log
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Failed(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unprocessable(msg) => write!(f, "Unprocessable: {}", msg),
            ApiError::Failed(msg) => write!(f, "Failed: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::Failed(msg) => msg,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<BrieflyError> for ApiError {
    fn from(err: BrieflyError) -> Self {
        match err {
            BrieflyError::InvalidInput(msg) => ApiError::BadRequest(msg),
            BrieflyError::Conflict(msg) => ApiError::Conflict(msg),
            BrieflyError::Auth(msg) => ApiError::Unauthorized(msg),
            BrieflyError::Extraction(msg) | BrieflyError::Pdf(msg) => {
                log::warn!("Upload could not be read: {}", msg);
                ApiError::Unprocessable("The uploaded file could not be read.".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<VideoSummaryError> for ApiError {
    fn from(err: VideoSummaryError) -> Self {
        let message = err.to_string();
        match err {
            VideoSummaryError::InvalidUrl => ApiError::BadRequest(message),
            VideoSummaryError::TranscriptUnavailable => ApiError::NotFound(message),
            VideoSummaryError::SummaryFailed => ApiError::Failed(message),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        let message = rejection.body_text();
        match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::Unprocessable(message),
            _ => ApiError::BadRequest(message),
        }
    }
}
