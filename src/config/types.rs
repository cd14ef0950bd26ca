use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Watch-ETL
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default = "PhaseConfig::listing", deserialize_with = "listing_phase")]
    pub listing: PhaseConfig,
    #[serde(default = "PhaseConfig::detail", deserialize_with = "detail_phase")]
    pub detail: PhaseConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Builds a configuration for `base_url` with every other section defaulted
    pub fn for_catalog(base_url: impl Into<String>) -> Self {
        Self {
            catalog: CatalogConfig {
                base_url: base_url.into(),
                total_pages: default_total_pages(),
            },
            listing: PhaseConfig::listing(),
            detail: PhaseConfig::detail(),
            fetch: FetchConfig::default(),
            artifacts: ArtifactConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// Catalog site being crawled
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Site root, e.g. "https://www.ethoswatches.com"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of listing pages to walk (1-indexed)
    #[serde(rename = "total-pages", default = "default_total_pages")]
    pub total_pages: u32,
}

/// Wave settings for one crawl phase
///
/// Listing and detail phases have different defaults, so a section is read
/// as a set of overrides on top of that phase's defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseConfig {
    /// Number of URLs fetched concurrently per wave
    pub batch_size: usize,

    /// Pause between waves (milliseconds)
    pub inter_batch_delay_ms: u64,
}

/// Keys present in a `[listing]` or `[detail]` section
#[derive(Debug, Deserialize)]
struct PhaseOverrides {
    #[serde(rename = "batch-size")]
    batch_size: Option<usize>,

    #[serde(rename = "inter-batch-delay-ms")]
    inter_batch_delay_ms: Option<u64>,
}

impl PhaseOverrides {
    fn apply(self, defaults: PhaseConfig) -> PhaseConfig {
        PhaseConfig {
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            inter_batch_delay_ms: self
                .inter_batch_delay_ms
                .unwrap_or(defaults.inter_batch_delay_ms),
        }
    }
}

fn listing_phase<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PhaseConfig, D::Error> {
    Ok(PhaseOverrides::deserialize(deserializer)?.apply(PhaseConfig::listing()))
}

fn detail_phase<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PhaseConfig, D::Error> {
    Ok(PhaseOverrides::deserialize(deserializer)?.apply(PhaseConfig::detail()))
}

impl PhaseConfig {
    /// Listing pages: 20 per wave, 3 seconds apart
    pub fn listing() -> Self {
        Self {
            batch_size: 20,
            inter_batch_delay_ms: 3_000,
        }
    }

    /// Detail pages: 10 per wave, 5 seconds apart
    pub fn detail() -> Self {
        Self {
            batch_size: 10,
            inter_batch_delay_ms: 5_000,
        }
    }

    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay_ms)
    }
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per URL while the server keeps answering 429
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first rate-limit retry (milliseconds)
    #[serde(rename = "backoff-base-ms", default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Upper bound on a single rate-limit delay (milliseconds)
    #[serde(rename = "backoff-max-ms", default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,

    /// Pool of User-Agent strings rotated per request
    #[serde(rename = "user-agents", default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            user_agents: default_user_agents(),
        }
    }
}

/// Local artifact locations shared between stages
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// JSON record set written by the extract stage
    #[serde(rename = "extracted-path", default = "default_extracted_path")]
    pub extracted_path: PathBuf,

    /// CSV table written by the transform stage
    #[serde(rename = "transformed-path", default = "default_transformed_path")]
    pub transformed_path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            extracted_path: default_extracted_path(),
            transformed_path: default_transformed_path(),
        }
    }
}

/// Object store destination for the load stage
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,

    #[serde(default = "default_key")]
    pub key: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint (MinIO, localstack); AWS when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(rename = "path-style", default)]
    pub path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            key: default_key(),
            region: default_region(),
            endpoint: None,
            path_style: false,
        }
    }
}

fn default_total_pages() -> u32 {
    // 6020 products at 50 per page
    6020 / 50
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_base_ms() -> u64 {
    5_000
}

fn default_backoff_max_ms() -> u64 {
    60_000
}

fn default_extracted_path() -> PathBuf {
    PathBuf::from("data/extracted_data.json")
}

fn default_transformed_path() -> PathBuf {
    PathBuf::from("data/transformed_data.csv")
}

fn default_bucket() -> String {
    "watchesdata".to_string()
}

fn default_key() -> String {
    "watches/transformed_data.csv".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        "Mozilla/5.0 (X11; Ubuntu; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    ]
    .iter()
    .map(|ua| ua.to_string())
    .collect()
}
