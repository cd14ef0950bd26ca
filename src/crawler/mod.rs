//! Crawler module for catalog extraction
//!
//! This module contains the extract stage, including:
//! - HTTP fetching with identity rotation and rate-limit retry
//! - Listing and detail page parsing
//! - Wave scheduling with fixed inter-wave delays
//! - Coordination of the listing and detail phases

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_extraction, Coordinator, ExtractReport};
pub use fetcher::{build_http_client, FetchResult, Fetcher, NetworkErrorKind, RetryPolicy};
pub use parser::{extract_detail, extract_listing, parse_detail, parse_listing};
pub use scheduler::BatchScheduler;
