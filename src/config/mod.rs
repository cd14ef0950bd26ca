//! Configuration module for Watch-ETL
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The configuration is loaded once at startup and passed read-only to every stage.
//!
//! # Example
//!
//! ```no_run
//! use watch_etl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("watch-etl.toml")).unwrap();
//! println!("Crawling {} listing pages", config.catalog.total_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ArtifactConfig, CatalogConfig, Config, FetchConfig, PhaseConfig, StorageConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
