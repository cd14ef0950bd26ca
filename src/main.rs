//! Watch-ETL main entry point
//!
//! This is the command-line interface for the watch catalog pipeline.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use watch_etl::catalog::listing_urls;
use watch_etl::config::{load_config_with_hash, Config};
use watch_etl::crawler::BatchScheduler;
use watch_etl::pipeline::{self, PipelineContext};
use watch_etl::storage::S3Store;

/// Watch-ETL: catalog extraction, normalization and upload
///
/// Watch-ETL crawls a retail watch catalog, normalizes the product attributes
/// into a CSV table, and publishes the table to S3. Each stage can be run on
/// its own so an external scheduler can sequence them.
#[derive(Parser, Debug)]
#[command(name = "watch-etl")]
#[command(version = "1.0.0")]
#[command(about = "Watch catalog ETL pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Pipeline stage to run
    #[arg(value_enum, value_name = "STAGE")]
    stage: Stage,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what the stage would do without running it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Stage {
    /// Crawl the catalog and write the JSON record set
    Extract,
    /// Normalize the record set into the CSV table
    Transform,
    /// Upload the CSV table and verify it
    Load,
    /// Run extract, transform and load in order
    All,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.stage);
        return Ok(());
    }

    let ctx = PipelineContext::new(config);
    let result = match cli.stage {
        Stage::Extract => pipeline::extract(&ctx).await,
        Stage::Transform => pipeline::transform(&ctx).await,
        Stage::Load => {
            let store = S3Store::new(&ctx.config().storage).await;
            pipeline::load(&ctx, &store).await
        }
        Stage::All => {
            let store = S3Store::new(&ctx.config().storage).await;
            pipeline::run_all(&ctx, &store).await
        }
    };

    if let Err(e) = result {
        tracing::error!("Stage {:?} failed: {}", cli.stage, e);
        return Err(e.into());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("watch_etl=info,warn"),
            1 => EnvFilter::new("watch_etl=debug,info"),
            2 => EnvFilter::new("watch_etl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what the selected stage would do
fn handle_dry_run(config: &Config, stage: Stage) {
    println!("=== Watch-ETL Dry Run ({:?}) ===\n", stage);

    if matches!(stage, Stage::Extract | Stage::All) {
        let urls = listing_urls(&config.catalog.base_url, config.catalog.total_pages);
        let listing = BatchScheduler::from_config("listing", &config.listing);

        println!("Catalog:");
        println!("  Base URL: {}", config.catalog.base_url);
        println!("  Listing pages: {}", urls.len());
        if let (Some(first), Some(last)) = (urls.first(), urls.last()) {
            println!("  First page: {}", first);
            println!("  Last page: {}", last);
        }

        println!("\nListing phase:");
        println!("  Batch size: {}", listing.batch_size());
        println!("  Batches: {}", listing.wave_count(urls.len()));
        println!("  Delay between batches: {}ms", config.listing.inter_batch_delay_ms);

        println!("\nDetail phase:");
        println!("  Batch size: {}", config.detail.batch_size);
        println!("  Delay between batches: {}ms", config.detail.inter_batch_delay_ms);

        println!("\nFetching:");
        println!("  Timeout: {}s", config.fetch.timeout_secs);
        println!("  Max attempts on 429: {}", config.fetch.max_attempts);
        println!(
            "  Backoff: {}ms doubling, capped at {}ms",
            config.fetch.backoff_base_ms, config.fetch.backoff_max_ms
        );
        println!("  User agents: {}", config.fetch.user_agents.len());
    }

    println!("\nArtifacts:");
    println!("  Extracted: {}", config.artifacts.extracted_path.display());
    println!("  Transformed: {}", config.artifacts.transformed_path.display());

    if matches!(stage, Stage::Load | Stage::All) {
        println!("\nStorage:");
        println!(
            "  Destination: s3://{}/{}",
            config.storage.bucket, config.storage.key
        );
        println!("  Region: {}", config.storage.region);
        if let Some(endpoint) = &config.storage.endpoint {
            println!("  Endpoint: {}", endpoint);
        }
        println!("  Path style: {}", config.storage.path_style);
    }

    println!("\n✓ Configuration is valid");
}
