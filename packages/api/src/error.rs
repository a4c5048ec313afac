//! JSON:API error document returned by every failing action.

use serde::{Deserialize, Serialize};

use crate::media::MediaType;

/// A single error object inside a [`JsonApiErrors`] document.
///
/// ```json
/// { "code": "not_found", "status": "404", "title": "Not Found", "detail": "resource r1 not found" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonApiError {
    /// Unique identifier for this occurrence of the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Machine-readable error code. See [`codes`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code, rendered as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Short summary of the problem type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The body of every error response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonApiErrors {
    pub errors: Vec<JsonApiError>,
}

impl JsonApiErrors {
    /// A document holding one error.
    ///
    /// `title` is the canonical reason phrase for `status`.
    pub fn single(
        status: u16,
        title: impl Into<String>,
        code: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            errors: vec![JsonApiError {
                id: None,
                code: Some(code.into()),
                status: Some(status.to_string()),
                title: Some(title.into()),
                detail: Some(detail.into()),
            }],
        }
    }

    /// The `code` of the first error, if any.
    pub fn first_code(&self) -> Option<&str> {
        self.errors.first().and_then(|e| e.code.as_deref())
    }

    /// The `detail` of the first error, if any.
    pub fn first_detail(&self) -> Option<&str> {
        self.errors.first().and_then(|e| e.detail.as_deref())
    }
}

impl MediaType for JsonApiErrors {
    const IDENTIFIER: &'static str = "application/vnd.api+json";
    const DESCRIPTION: &'static str = "JSONAPI error response";
}

/// Well-known error codes.
///
/// | `code` | HTTP status |
/// |--------|------------|
/// | `bad_parameter` | 400 |
/// | `unauthorized` | 401 |
/// | `not_found` | 404 |
/// | `method_not_allowed` | 405 |
/// | `internal_error` | 500 |
pub mod codes {
    pub const BAD_PARAMETER: &str = "bad_parameter";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const NOT_FOUND: &str = "not_found";
    pub const METHOD_NOT_ALLOWED: &str = "method_not_allowed";
    pub const INTERNAL_ERROR: &str = "internal_error";
}
