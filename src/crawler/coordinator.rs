//! Extraction coordinator - drives the two crawl phases
//!
//! Phase one walks every catalog listing page and collects product links.
//! Phase two fetches every product page and builds attribute records. Each
//! phase owns one HTTP client (and connection pool) for all of its fetches.

use crate::catalog::{listing_urls, resolve_product_link};
use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{extract_detail, extract_listing};
use crate::crawler::scheduler::BatchScheduler;
use crate::record::RecordSet;
use crate::{ConfigError, EtlError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use url::Url;

/// Outcome of a complete extraction run
#[derive(Debug, Clone)]
pub struct ExtractReport {
    /// Number of listing pages requested
    pub listing_pages: usize,

    /// Number of product links found (duplicates included)
    pub links: usize,

    /// Records extracted from product pages
    pub records: RecordSet,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,
}

impl ExtractReport {
    /// Product pages that yielded no record
    pub fn dropped(&self) -> usize {
        self.links.saturating_sub(self.records.len())
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Main extraction coordinator
pub struct Coordinator {
    config: Arc<Config>,
    base_url: Url,
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - The shared, read-only configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(EtlError)` - The catalog base URL does not parse
    pub fn new(config: Arc<Config>) -> Result<Self, EtlError> {
        let base_url = Url::parse(&config.catalog.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", config.catalog.base_url, e))
        })?;

        Ok(Self { config, base_url })
    }

    /// Collects product links from every listing page
    ///
    /// Links come back in listing-page order and are not deduplicated: a
    /// product shown on two pages is fetched twice.
    pub async fn extract_links(&self) -> Result<Vec<String>, EtlError> {
        let urls = listing_urls(&self.config.catalog.base_url, self.config.catalog.total_pages);
        let fetcher = Fetcher::new(&self.config.fetch)?;
        let scheduler = BatchScheduler::from_config("listing", &self.config.listing);

        tracing::info!(
            "Crawling {} listing pages in {} batches",
            urls.len(),
            scheduler.wave_count(urls.len())
        );

        let hrefs = scheduler
            .run(&urls, |url| {
                let fetcher = &fetcher;
                async move {
                    let page = fetcher.fetch(&url).await;
                    extract_listing(&url, page.as_deref())
                }
            })
            .await;

        let links: Vec<String> = hrefs
            .into_iter()
            .filter_map(|href| {
                let resolved = resolve_product_link(&href, &self.base_url);
                if resolved.is_none() {
                    tracing::debug!("Skipping unusable product link '{}'", href);
                }
                resolved
            })
            .collect();

        tracing::info!("Collected {} product links", links.len());
        Ok(links)
    }

    /// Fetches every product page and extracts its attribute record
    ///
    /// Pages that fail to fetch or parse are left out; the result never
    /// contains placeholders.
    pub async fn extract_watch_data(&self, links: &[String]) -> Result<RecordSet, EtlError> {
        let fetcher = Fetcher::new(&self.config.fetch)?;
        let scheduler = BatchScheduler::from_config("detail", &self.config.detail);

        tracing::info!(
            "Fetching {} product pages in {} batches",
            links.len(),
            scheduler.wave_count(links.len())
        );

        let records = scheduler
            .run(links, |url| {
                let fetcher = &fetcher;
                async move {
                    let page = fetcher.fetch(&url).await;
                    extract_detail(&url, page.as_deref())
                }
            })
            .await;

        tracing::info!(
            "Extracted {} records from {} product pages",
            records.len(),
            links.len()
        );
        Ok(records)
    }

    /// Runs both phases
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractReport)` - At least one record was extracted
    /// * `Err(EtlError::NoLinks)` - No listing page produced a product link
    /// * `Err(EtlError::NoRecords)` - No product page produced a record
    pub async fn run(&self) -> Result<ExtractReport, EtlError> {
        let started_at = Utc::now();

        let links = self.extract_links().await?;
        if links.is_empty() {
            return Err(EtlError::NoLinks);
        }

        let records = self.extract_watch_data(&links).await?;
        if records.is_empty() {
            return Err(EtlError::NoRecords);
        }

        let report = ExtractReport {
            listing_pages: self.config.catalog.total_pages as usize,
            links: links.len(),
            records,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Extraction completed in {}s: {} listing pages, {} links, {} records, {} dropped",
            report.duration_seconds(),
            report.listing_pages,
            report.links,
            report.records.len(),
            report.dropped()
        );

        Ok(report)
    }
}

/// Runs a complete extraction with the given configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use watch_etl::config::load_config;
/// use watch_etl::crawler::run_extraction;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(load_config(Path::new("watch-etl.toml"))?);
/// let report = run_extraction(config).await?;
/// println!("{} watches", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_extraction(config: Arc<Config>) -> Result<ExtractReport, EtlError> {
    Coordinator::new(config)?.run().await
}
