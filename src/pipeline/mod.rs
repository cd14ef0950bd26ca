//! Pipeline module: the three stage tasks an external scheduler invokes
//!
//! Stages exchange data only through artifacts on disk and the object
//! store, so each task can run in its own process:
//!
//! - `extract` writes the JSON record set
//! - `transform` reads it and writes the CSV table
//! - `load` uploads the table and verifies the stored object

mod artifact;
mod tasks;

pub use artifact::check_file_content;
pub use tasks::{extract, load, run_all, transform};

use crate::config::Config;
use std::sync::Arc;

/// Read-only configuration shared by every stage task
#[derive(Debug, Clone)]
pub struct PipelineContext {
    config: Arc<Config>,
}

impl PipelineContext {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shared_config(&self) -> &Arc<Config> {
        &self.config
    }
}
