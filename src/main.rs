//! Ranklist-Scraper main entry point
//!
//! This is the command-line interface for the Ranklist-Scraper listing harvester.

use anyhow::Context;
use clap::Parser;
use ranklist_scraper::config::{load_config_with_hash, validate, Config};
use ranklist_scraper::crawler::scrape;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ranklist-Scraper: a polite paginated listing harvester
///
/// Fetches a fixed number of listing pages concurrently, extracts one record
/// per list item, and writes them all to a JSON file. Runs with built-in
/// defaults when no configuration file is given.
#[derive(Parser, Debug)]
#[command(name = "ranklist-scraper")]
#[command(version = "1.0.0")]
#[command(about = "A polite paginated listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the JSON output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration and page URLs without fetching
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics for an existing output file and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if let Some(output) = &cli.output {
        config.output.json_path = output.clone();
        validate(&config)?;
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_scrape(&config).await?;
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
            0 => EnvFilter::new("ranklist_scraper=info,warn"),
            1 => EnvFilter::new("ranklist_scraper=debug,info"),
            2 => EnvFilter::new("ranklist_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    use ranklist_scraper::url::page_requests;

    println!("=== Ranklist-Scraper Dry Run ===\n");

    println!("Listing:");
    println!("  URL template: {}", config.listing.url_template);
    println!("  Pages: {}", config.listing.page_count);
    println!("  Page size: {}", config.listing.page_size);

    println!("\nFetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Launch delay: {}ms", config.fetch.launch_delay_ms);
    println!("  Max in flight: {}", config.fetch.max_in_flight);

    println!("\nSelectors:");
    for (key, selector) in config.selectors.entries() {
        println!("  {}: {}", key, selector);
    }

    println!("\nOutput:");
    println!("  JSON: {}", config.output.json_path.display());

    let requests = page_requests(&config.listing)?;
    println!("\nPages ({}):", requests.len());
    for request in &requests {
        println!("  [{}] {}", request.index, request.url);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: summarizes an existing output file
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use ranklist_scraper::output::{print_record_statistics, read_records, record_statistics};

    let path = config.output.json_path.as_path();
    println!("Output file: {}\n", path.display());

    let records = read_records(path)?;
    print_record_statistics(&record_statistics(&records));

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {} pages of {} items",
        config.listing.page_count,
        config.listing.page_size
    );

    match scrape(config).await {
        Ok(report) => {
            tracing::info!(
                "Scrape finished: {} of {} nominal records",
                report.records,
                report.nominal_records(config.listing.page_size)
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
