//! In-memory storage implementation.
//!
//! All data is held in RAM behind a [`RwLock`] and is lost when the process
//! exits. Use this for tests, the conformance suite, and ephemeral registries.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{ResourceRecord, Storage, StorageError};

/// Thread-safe, in-memory implementation of [`Storage`].
pub struct MemoryStorage {
    resources: RwLock<HashMap<String, ResourceRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.resources
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put_resource(&self, resource: &ResourceRecord) -> Result<(), StorageError> {
        let mut resources = self.resources.write().unwrap_or_else(|p| p.into_inner());
        if resources.contains_key(&resource.resource_id) {
            return Err(StorageError::Conflict(format!(
                "resource {} already exists",
                resource.resource_id
            )));
        }
        // Checked under the write lock so a concurrent delete cannot orphan the record.
        let parent = resource
            .parent_resource_id
            .as_deref()
            .and_then(|id| resources.get(id));
        resource.check_parent(parent)?;
        resources.insert(resource.resource_id.clone(), resource.clone());
        Ok(())
    }

    async fn get_resource(&self, id: &str) -> Result<Option<ResourceRecord>, StorageError> {
        let resources = self.resources.read().unwrap_or_else(|p| p.into_inner());
        Ok(resources.get(id).cloned())
    }

    async fn delete_resource(&self, id: &str) -> Result<(), StorageError> {
        let mut resources = self.resources.write().unwrap_or_else(|p| p.into_inner());
        resources
            .remove(id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}
