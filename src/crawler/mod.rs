//! Crawler module for the concurrent fetch-aggregate pipeline
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching of individual listing pages
//! - Record extraction from listing documents
//! - Paced, bounded launching of page tasks
//! - Receipt-order aggregation of page batches

mod aggregator;
mod coordinator;
mod fetcher;
mod launcher;
mod parser;

pub use aggregator::{aggregate, Aggregate};
pub use coordinator::{Coordinator, Harvest};
pub use fetcher::{build_http_client, PageFetcher};
pub use launcher::Launcher;
pub use parser::{Extractor, SelectorExtractor};

use crate::config::Config;
use crate::output::{print_report, JsonSink, RecordSink, RunReport};
use std::time::Instant;

/// Runs a complete scrape
///
/// This is the main entry point. It will:
/// 1. Build the page requests, HTTP client and extractor
/// 2. Launch and aggregate every page
/// 3. Write the JSON artifact
/// 4. Print the summary, whether or not the write succeeded
///
/// # Returns
///
/// * `Ok(RunReport)` - The run finished; failed pages only lower the record count
/// * `Err(ScrapeError::Sink)` - The artifact could not be written and
///   `output.allow-sink-failure` is off
/// * `Err(ScrapeError)` - The run could not be set up
pub async fn scrape(config: &Config) -> crate::Result<RunReport> {
    let start = Instant::now();
    let coordinator = Coordinator::new(config)?;
    let Harvest {
        records,
        mut report,
    } = coordinator.run().await;

    let sink = JsonSink::new(&config.output.json_path);
    let persisted = sink.persist(&records);
    drop(records);

    match &persisted {
        Ok(()) => report.persisted_to = Some(sink.path().to_path_buf()),
        Err(e) => tracing::error!("Failed to save results to {}: {}", sink.destination(), e),
    }

    report.elapsed = start.elapsed();
    print_report(&report);

    match persisted {
        Err(e) if !config.output.allow_sink_failure => Err(e.into()),
        _ => Ok(report),
    }
}
