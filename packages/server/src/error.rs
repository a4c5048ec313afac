//! Application-level error type returned by handlers.
//!
//! All variants serialise to the JSON:API [`JsonApiErrors`] document. Handlers
//! only emit the statuses every action declares (400, 401, 404, 500); 405 is
//! reserved for requests that match no action.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use resource_registry_api::{error::codes, JsonApiErrors, MediaType, ValidationError};

use crate::storage::StorageError;

/// An error that a handler can return; converts directly to an HTTP response.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    /// The path exists but not for this method; only raised by the router fallback.
    MethodNotAllowed(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => codes::BAD_PARAMETER,
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::MethodNotAllowed(_) => codes::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let detail = match self {
            AppError::Internal(msg) => {
                // Backend detail stays in the log.
                tracing::error!("internal error: {msg}");
                "an internal error occurred".to_string()
            }
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg) => msg,
        };
        let title = status.canonical_reason().unwrap_or("Error");
        let body = JsonApiErrors::single(status.as_u16(), title, code, detail);

        let mut resp = (status, Json(body)).into_response();
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JsonApiErrors::IDENTIFIER),
        );
        resp
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound => AppError::NotFound("resource not found".into()),
            StorageError::Conflict(msg) => AppError::BadRequest(msg),
            e @ StorageError::ParentNotFound(_) => AppError::NotFound(e.to_string()),
            e @ StorageError::ParentTypeMismatch { .. } => AppError::BadRequest(e.to_string()),
            StorageError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

// Extractor rejections carry their own statuses (415, 422, ...); the route
// table only declares 400 for malformed requests.
impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}
