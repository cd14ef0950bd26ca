//! Wave scheduler for bounded-concurrency crawling
//!
//! URLs are processed in consecutive waves of `batch_size`. Every operation
//! of a wave runs concurrently and the whole wave is awaited before the next
//! one starts, with a fixed pause in between. There is no sliding window:
//! the remote site sees bursts of at most `batch_size` requests separated
//! by quiet periods.

use crate::config::PhaseConfig;
use futures::future::join_all;
use std::future::Future;
use std::time::Duration;

/// Runs operations over a URL list in fixed-size concurrent waves
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    /// Label used in progress logs ("listing", "detail")
    phase: &'static str,

    /// Number of operations in flight per wave
    batch_size: usize,

    /// Pause between consecutive waves
    inter_batch_delay: Duration,
}

impl BatchScheduler {
    /// Creates a new scheduler
    ///
    /// A `batch_size` of zero is treated as one.
    pub fn new(phase: &'static str, batch_size: usize, inter_batch_delay: Duration) -> Self {
        Self {
            phase,
            batch_size: batch_size.max(1),
            inter_batch_delay,
        }
    }

    /// Creates a scheduler from a phase section of the configuration
    pub fn from_config(phase: &'static str, config: &PhaseConfig) -> Self {
        Self::new(phase, config.batch_size, config.inter_batch_delay())
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn inter_batch_delay(&self) -> Duration {
        self.inter_batch_delay
    }

    /// Number of waves needed for `url_count` URLs
    pub fn wave_count(&self, url_count: usize) -> usize {
        url_count.div_ceil(self.batch_size)
    }

    /// Runs `op` over every URL and flattens the results
    ///
    /// Each operation yields an iterable: a listing page yields its links,
    /// a detail page yields zero or one record. Results are concatenated
    /// wave by wave; within a wave they keep the input order. An operation
    /// that yields nothing is simply skipped, it never stops the run.
    ///
    /// # Arguments
    ///
    /// * `urls` - The URLs to process
    /// * `op` - Fetch + extract for a single URL
    ///
    /// # Returns
    ///
    /// Every item produced by every operation
    pub async fn run<F, Fut, I>(&self, urls: &[String], mut op: F) -> Vec<I::Item>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = I>,
        I: IntoIterator,
    {
        let total_waves = self.wave_count(urls.len());
        let mut collected = Vec::new();

        for (index, wave) in urls.chunks(self.batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.inter_batch_delay).await;
            }

            let outcomes = join_all(wave.iter().cloned().map(&mut op)).await;

            let before = collected.len();
            for outcome in outcomes {
                collected.extend(outcome);
            }

            tracing::info!(
                "{} batch {}/{} completed: {} urls, {} results",
                self.phase,
                index + 1,
                total_waves,
                wave.len(),
                collected.len() - before
            );
        }

        collected
    }
}
