//! Scrape coordinator - fan-out/fan-in orchestration
//!
//! This module wires the pieces of a run together:
//! - Building the page requests, HTTP client and extractor once
//! - Launching one task per page through the [`Launcher`]
//! - Draining exactly one batch per launched task through the aggregator

use crate::config::Config;
use crate::crawler::aggregator::aggregate;
use crate::crawler::fetcher::{build_http_client, PageFetcher};
use crate::crawler::launcher::Launcher;
use crate::crawler::parser::{Extractor, SelectorExtractor};
use crate::output::RunReport;
use crate::record::Record;
use crate::url::{page_requests, PageRequest};
use crate::ScrapeError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Records collected by a run together with its report
#[derive(Debug)]
pub struct Harvest {
    /// All records, in batch receipt order
    pub records: Vec<Record>,

    /// Run summary; `persisted_to` is left for the caller to fill
    pub report: RunReport,
}

/// Main scrape coordinator structure
pub struct Coordinator {
    requests: Vec<PageRequest>,
    fetcher: Arc<PageFetcher>,
    launcher: Launcher,
}

impl Coordinator {
    /// Creates a coordinator using the selector extractor from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError)` - The URL template, selectors or HTTP client were invalid
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let extractor = SelectorExtractor::from_config(&config.selectors)?;
        Self::with_extractor(config, Arc::new(extractor))
    }

    /// Creates a coordinator with a caller-supplied extractor
    pub fn with_extractor(
        config: &Config,
        extractor: Arc<dyn Extractor>,
    ) -> Result<Self, ScrapeError> {
        let requests = page_requests(&config.listing)?;
        let client = build_http_client(&config.fetch)?;

        Ok(Self {
            requests,
            fetcher: Arc::new(PageFetcher::new(client, extractor)),
            launcher: Launcher::from_config(&config.fetch),
        })
    }

    /// The page requests this coordinator will launch, in launch order
    pub fn requests(&self) -> &[PageRequest] {
        &self.requests
    }

    /// Runs every page task and aggregates the results
    ///
    /// All tasks are launched first; the aggregator then performs exactly one
    /// receive per launched task. Page failures only shrink the result.
    pub async fn run(&self) -> Harvest {
        let started_at = Utc::now();
        let start = Instant::now();
        let expected = self.requests.len();

        tracing::info!("Launching {} page tasks", expected);

        let (tx, mut rx) = mpsc::channel(expected.max(1));
        let fetcher = Arc::clone(&self.fetcher);
        let launched = self
            .launcher
            .launch(self.requests.clone(), tx, move |request| {
                let fetcher = Arc::clone(&fetcher);
                async move { fetcher.fetch_batch(&request).await }
            })
            .await;

        let collected = aggregate(&mut rx, launched).await;

        tracing::info!(
            "Collected {} records from {} batches ({} empty)",
            collected.records.len(),
            collected.batches_received,
            collected.empty_batches
        );
        tracing::debug!("Batch arrival order: {:?}", collected.arrival_order);

        let report = RunReport {
            started_at,
            pages_launched: launched,
            batches_received: collected.batches_received,
            empty_batches: collected.empty_batches,
            records: collected.records.len(),
            elapsed: start.elapsed(),
            persisted_to: None,
        };

        Harvest {
            records: collected.records,
            report,
        }
    }
}
