//! Media types for the `resource` entity.
//!
//! Each media type is a named JSON representation with a single `default`
//! view that renders every attribute. Optional attributes that are absent
//! are omitted from the serialized form.

use serde::{Deserialize, Serialize};

/// A named JSON representation used as a request payload or response body.
pub trait MediaType {
    /// The media type identifier, sent as `Content-Type`.
    const IDENTIFIER: &'static str;

    /// Human-readable description of the representation.
    const DESCRIPTION: &'static str;
}

/// Errors returned by payload validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required attribute is absent or blank.
    #[error("attribute \"{0}\" is required")]
    MissingAttribute(&'static str),
}

// ---------------------------------------------------------------------------
// ResourceMedia
// ---------------------------------------------------------------------------

/// A protected resource, as returned by `GET /resource/{resourceId}`.
///
/// # Example
///
/// ```json
/// {
///   "resource_scopes": [],
///   "type": "area",
///   "parent_resource_id": "0192f5c4-0000-7000-8000-000000000001",
///   "resource_id": "0192f5c4-0000-7000-8000-000000000002"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceMedia {
    /// The valid scopes for this resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_scopes: Option<Vec<String>>,

    /// The type of resource.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// The parent resource (of the same type) to which this resource belongs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_resource_id: Option<String>,

    /// The identifier for this resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl MediaType for ResourceMedia {
    const IDENTIFIER: &'static str = "application/vnd.resource+json";
    const DESCRIPTION: &'static str = "A Protected Resource";
}

// ---------------------------------------------------------------------------
// RegisterResourceMedia
// ---------------------------------------------------------------------------

/// Payload for `POST /resource`.
///
/// Only `type` is required. When `resource_id` is absent or blank the server
/// generates one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResourceMedia {
    /// The type of resource.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// The parent resource (of the same type) to which this resource belongs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_resource_id: Option<String>,

    /// The identifier for this resource. If left blank, one will be generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl RegisterResourceMedia {
    /// Build a payload for a resource of the given type.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: Some(resource_type.into()),
            ..Default::default()
        }
    }

    /// Check the required attributes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.resource_type.as_deref() {
            Some(t) if !t.trim().is_empty() => Ok(()),
            _ => Err(ValidationError::MissingAttribute("type")),
        }
    }

    /// The caller-supplied identifier, or `None` when absent or blank.
    pub fn requested_id(&self) -> Option<&str> {
        non_blank(self.resource_id.as_deref())
    }

    /// The parent identifier, or `None` when absent or blank.
    pub fn parent_id(&self) -> Option<&str> {
        non_blank(self.parent_resource_id.as_deref())
    }
}

impl MediaType for RegisterResourceMedia {
    const IDENTIFIER: &'static str = "application/vnd.register_resource+json";
    const DESCRIPTION: &'static str = "Payload for registering a resource";
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// RegisterResourceResponseMedia
// ---------------------------------------------------------------------------

/// Response body for a successful `POST /resource` (HTTP 201).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResourceResponseMedia {
    /// The identifier for the registered resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl MediaType for RegisterResourceResponseMedia {
    const IDENTIFIER: &'static str = "application/vnd.register_resource_response+json";
    const DESCRIPTION: &'static str = "Response returned when a resource is registered";
}
