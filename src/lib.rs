//! Watch-ETL: a catalog crawler feeding a three-stage ETL pipeline
//!
//! This crate crawls a retail watch catalog, extracts per-product attribute
//! records, normalizes them into a CSV table, and publishes the table to an
//! object store. The three stages are exposed as task entry points that an
//! external scheduler invokes in order.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod pipeline;
pub mod record;
pub mod storage;
pub mod transform;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Watch-ETL operations
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("No product links were extracted")]
    NoLinks,

    #[error("No watch data was extracted")]
    NoRecords,

    #[error("Input file {} is missing", path.display())]
    MissingArtifact { path: PathBuf },

    #[error("Artifact {} is empty", path.display())]
    EmptyArtifact { path: PathBuf },

    #[error("Transform produced an empty table")]
    EmptyTable,

    #[error("Object s3://{bucket}/{key} was not found after upload")]
    UploadNotFound { bucket: String, key: String },

    #[error("Uploaded object s3://{bucket}/{key} is empty")]
    UploadEmpty { bucket: String, key: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// HTML shape errors raised while parsing catalog pages
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid selector '{0}'")]
    Selector(String),

    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("Empty field: {0}")]
    EmptyField(String),
}

/// Result type alias for Watch-ETL operations
pub type Result<T> = std::result::Result<T, EtlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for HTML parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::PipelineContext;
pub use record::{AttributeRecord, RecordSet};
pub use transform::NormalizedTable;
