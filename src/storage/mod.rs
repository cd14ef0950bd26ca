//! Storage module for publishing pipeline output
//!
//! This module handles the load stage's object store, including:
//! - The backend trait used by the pipeline
//! - An S3 implementation for production and S3-compatible servers
//! - An in-memory implementation for dry runs and tests

mod memory;
mod s3;
mod traits;

pub use memory::MemoryStore;
pub use s3::S3Store;
pub use traits::{ObjectInfo, ObjectStore, StorageError, StorageResult};

/// Content type recorded with the uploaded table
pub const CSV_CONTENT_TYPE: &str = "text/csv";
