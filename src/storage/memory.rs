//! In-process object store
//!
//! Holds objects in a map; used for dry runs and tests.

use crate::storage::traits::{ObjectInfo, ObjectStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

/// Object store kept entirely in memory
///
/// Clones share the same contents.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    bucket: String,
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Body of the object under `key`, if any
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .ok()?
            .get(key)
            .map(|object| object.data.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .ok()?
            .get(key)
            .map(|object| object.content_type.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|e| StorageError::Upload(e.to_string()))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn head(&self, key: &str) -> StorageResult<Option<ObjectInfo>> {
        let objects = self
            .objects
            .read()
            .map_err(|e| StorageError::Head(e.to_string()))?;
        Ok(objects.get(key).map(|object| ObjectInfo {
            key: key.to_string(),
            size: object.data.len() as i64,
        }))
    }
}
