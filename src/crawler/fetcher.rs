//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the per-phase HTTP client
//! - Rotating the User-Agent header on every request
//! - Bounded retry with exponential backoff on HTTP 429
//! - Classifying transport failures

use crate::config::FetchConfig;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered with something other than 429
    ///
    /// The status is not checked here; a non-200 body simply fails to parse
    /// downstream.
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Every attempt was answered with HTTP 429
    RateLimited {
        /// Number of attempts made
        attempts: u32,
    },

    /// Network error (timeout, connection refused/reset, body read failure)
    NetworkError {
        /// What kind of failure it was
        kind: NetworkErrorKind,
        /// Error description
        error: String,
    },
}

/// Classification of transport-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Timeout,
    Connect,
    Body,
    Other,
}

impl NetworkErrorKind {
    fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect
        } else if error.is_body() || error.is_decode() {
            Self::Body
        } else {
            Self::Other
        }
    }
}

/// Bounded exponential backoff applied to HTTP 429 responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first request
    pub max_attempts: u32,
    /// Delay after the first rate-limited attempt
    pub base_delay: Duration,
    /// Cap on any single delay
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.backoff_base_ms),
            max_delay: Duration::from_millis(config.backoff_max_ms),
        }
    }

    /// Delay to wait after attempt number `attempt` (1-based) was rate limited
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

/// Builds the HTTP client shared by every fetch of one crawl phase
///
/// No default User-Agent is set; each request picks one from the pool.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetch client: one connection pool plus the identity pool and retry policy
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agents: Arc<[String]>,
    retry: RetryPolicy,
}

impl Fetcher {
    /// Creates a fetcher with a fresh HTTP client
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &FetchConfig) -> Self {
        Self {
            client,
            user_agents: config.user_agents.clone().into(),
            retry: RetryPolicy::from_config(config),
        }
    }

    /// Picks a User-Agent uniformly at random from the pool
    fn pick_user_agent(&self) -> &str {
        match self.user_agents.len() {
            0 => "",
            len => &self.user_agents[fastrand::usize(..len)],
        }
    }

    /// Fetches a URL and returns its body, or None on any failure
    ///
    /// Failures have already been logged with the URL by the time None is
    /// returned.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        match self.fetch_url(url).await {
            FetchResult::Success { body, .. } => Some(body),
            FetchResult::RateLimited { .. } | FetchResult::NetworkError { .. } => None,
        }
    }

    /// Fetches a URL with rate-limit retry and error classification
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 429 | Sleep (exponential backoff), retry up to `max_attempts` |
    /// | Any other status | Return body as-is |
    /// | Timeout | Immediate → NetworkError |
    /// | Connection refused/reset | Immediate → NetworkError |
    /// | Body read failure | Immediate → NetworkError |
    pub async fn fetch_url(&self, url: &str) -> FetchResult {
        let mut attempt = 1;

        loop {
            let request = self
                .client
                .get(url)
                .header(USER_AGENT, self.pick_user_agent());

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => return network_error(url, &e),
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt >= self.retry.max_attempts {
                    tracing::error!(
                        "Rate limit persisted after {} attempts, giving up on {}",
                        attempt,
                        url
                    );
                    return FetchResult::RateLimited { attempts: attempt };
                }

                let delay = self.retry.delay_after(attempt);
                tracing::warn!(
                    "Rate limit hit (attempt {}/{}), sleeping {:?} before retrying {}",
                    attempt,
                    self.retry.max_attempts,
                    delay,
                    url
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                tracing::debug!("HTTP {} for {}", status.as_u16(), url);
            }

            return match response.text().await {
                Ok(body) => FetchResult::Success {
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => network_error(url, &e),
            };
        }
    }
}

fn network_error(url: &str, error: &reqwest::Error) -> FetchResult {
    let kind = NetworkErrorKind::classify(error);
    match kind {
        NetworkErrorKind::Timeout => {
            tracing::error!("Timeout error occurred while fetching {}", url)
        }
        NetworkErrorKind::Connect => {
            tracing::error!("Connection error occurred while fetching {}: {}", url, error)
        }
        NetworkErrorKind::Body => {
            tracing::error!("Failed to read response body from {}: {}", url, error)
        }
        NetworkErrorKind::Other => {
            tracing::error!("Unexpected error occurred while fetching {}: {}", url, error)
        }
    }

    FetchResult::NetworkError {
        kind,
        error: error.to_string(),
    }
}
