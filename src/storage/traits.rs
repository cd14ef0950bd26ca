//! Storage traits and error types
//!
//! This module defines the trait interface for object store backends and
//! associated error types.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during object store operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Metadata lookup failed: {0}")]
    Head(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Metadata reported for a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,

    /// Size in bytes as reported by the store
    pub size: i64,
}

/// Trait for object store implementations
///
/// Keys are relative to the backend's bucket. Implementations must be
/// shareable across tasks.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket (or equivalent namespace) objects are written to
    fn bucket(&self) -> &str;

    /// Stores `data` under `key`, replacing any existing object
    ///
    /// # Arguments
    ///
    /// * `key` - Object key within the bucket
    /// * `data` - Object body
    /// * `content_type` - MIME type recorded with the object
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Reads a local file and stores its bytes under `key`
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of bytes uploaded
    /// * `Err(StorageError::Io)` - The file could not be read
    /// * `Err(StorageError::Upload)` - The store rejected the object
    async fn upload_file(&self, key: &str, path: &Path, content_type: &str) -> StorageResult<usize> {
        let data = tokio::fs::read(path).await?;
        let size = data.len();
        self.upload(key, data, content_type).await?;
        Ok(size)
    }

    /// Looks up an object's metadata
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ObjectInfo))` - The object exists
    /// * `Ok(None)` - No object is stored under `key`
    /// * `Err(StorageError)` - The store could not be queried
    async fn head(&self, key: &str) -> StorageResult<Option<ObjectInfo>>;

    /// Whether an object is stored under `key`
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.head(key).await?.is_some())
    }
}
