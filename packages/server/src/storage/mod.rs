//! Storage abstraction layer for the resource registry.
//!
//! The [`Storage`] trait defines the contract between the HTTP handler layer
//! and persistence. Parent checks and identifier generation live in the
//! handlers; storage is purely a data access layer.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryStorage`] | Tests, conformance suite, ephemeral registries |
//! | [`SqliteStorage`] | Production; durable single-file database |
//!
//! [`MemoryStorage`]: memory::MemoryStorage
//! [`SqliteStorage`]: sqlite::SqliteStorage

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use resource_registry_api::ResourceMedia;

/// Errors that storage operations can return.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested item does not exist.
    #[error("not found")]
    NotFound,

    /// An item with the same key already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The record names a parent that does not exist.
    #[error("parent resource {0} not found")]
    ParentNotFound(String),

    /// The record names a parent of a different type.
    #[error("parent resource {parent} is of type {found:?}, expected {expected:?}")]
    ParentTypeMismatch {
        parent: String,
        found: String,
        expected: String,
    },

    /// An unexpected error in the underlying storage backend.
    #[error("internal storage error: {0}")]
    Internal(String),
}

/// A registered resource as held by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub resource_id: String,
    pub resource_type: String,
    pub parent_resource_id: Option<String>,
    pub resource_scopes: Vec<String>,
}

impl ResourceRecord {
    /// Check that `parent` may own this record.
    pub fn check_parent(&self, parent: Option<&ResourceRecord>) -> Result<(), StorageError> {
        let Some(parent_id) = self.parent_resource_id.as_deref() else {
            return Ok(());
        };
        let parent = parent.ok_or_else(|| StorageError::ParentNotFound(parent_id.to_string()))?;
        if parent.resource_type != self.resource_type {
            return Err(StorageError::ParentTypeMismatch {
                parent: parent_id.to_string(),
                found: parent.resource_type.clone(),
                expected: self.resource_type.clone(),
            });
        }
        Ok(())
    }

    pub fn new(resource_id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_type: resource_type.into(),
            parent_resource_id: None,
            resource_scopes: Vec::new(),
        }
    }
}

impl From<ResourceRecord> for ResourceMedia {
    fn from(r: ResourceRecord) -> Self {
        ResourceMedia {
            resource_scopes: Some(r.resource_scopes),
            resource_type: Some(r.resource_type),
            parent_resource_id: r.parent_resource_id,
            resource_id: Some(r.resource_id),
        }
    }
}

/// The persistence contract for the registry.
///
/// Implementations must be `Send + Sync + 'static` so they can be held in an
/// `Arc<dyn Storage>`.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Persist a resource. Returns [`StorageError::Conflict`] if a resource
    /// with the same `resource_id` already exists.
    ///
    /// When `parent_resource_id` is set, the parent must exist and share the
    /// record's type ([`StorageError::ParentNotFound`],
    /// [`StorageError::ParentTypeMismatch`]). The check and the insert are
    /// atomic with respect to [`Storage::delete_resource`].
    async fn put_resource(&self, resource: &ResourceRecord) -> Result<(), StorageError>;

    /// Retrieve a resource by identifier. Returns `None` if not found.
    async fn get_resource(&self, id: &str) -> Result<Option<ResourceRecord>, StorageError>;

    /// Remove a resource. Returns [`StorageError::NotFound`] if it does not
    /// exist. Child resources are left in place.
    async fn delete_resource(&self, id: &str) -> Result<(), StorageError>;
}
