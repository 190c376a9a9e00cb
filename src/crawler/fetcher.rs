//! HTTP fetcher implementation
//!
//! This module handles the single GET each page task performs:
//! - Building the shared HTTP client with the configured user agent and timeouts
//! - Fetching one listing page and handing its body to the extractor
//! - Absorbing every failure into an empty batch

use crate::config::FetchConfig;
use crate::crawler::parser::Extractor;
use crate::record::{PageBatch, Record};
use crate::url::PageRequest;
use crate::PageError;
use reqwest::Client;
use std::sync::Arc;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use ranklist_scraper::config::FetchConfig;
/// use ranklist_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches listing pages and extracts their records
///
/// Holds no per-page state; one instance is shared by every page task.
pub struct PageFetcher {
    client: Client,
    extractor: Arc<dyn Extractor>,
}

impl PageFetcher {
    pub fn new(client: Client, extractor: Arc<dyn Extractor>) -> Self {
        Self { client, extractor }
    }

    /// Fetches one page and extracts its records
    ///
    /// # Error Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | `PageError::Timeout` |
    /// | Connect / request / body failure | `PageError::Transport` |
    /// | Non-2xx status | `PageError::Status` |
    /// | Extractor rejects the document | `PageError::Parse` |
    ///
    /// No retry is attempted.
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Record>, PageError> {
        let url = request.url.as_str();

        let response = self
            .client
            .get(request.url.clone())
            .send()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        self.extractor
            .extract(&body)
            .map_err(|source| PageError::Parse {
                url: url.to_string(),
                source,
            })
    }

    /// Runs one page task to completion
    ///
    /// Always returns a batch: failures are logged and become an empty batch
    /// so sibling pages and the aggregator are unaffected.
    pub async fn fetch_batch(&self, request: &PageRequest) -> PageBatch {
        match self.fetch_page(request).await {
            Ok(records) => {
                tracing::debug!(
                    "Page {} yielded {} records from {}",
                    request.index,
                    records.len(),
                    request.url
                );
                PageBatch::new(request.index, records)
            }
            Err(e) => {
                tracing::warn!("Page {} contributed no records: {}", request.index, e);
                PageBatch::empty(request.index)
            }
        }
    }
}

fn classify_transport_error(url: &str, error: reqwest::Error) -> PageError {
    if error.is_timeout() {
        PageError::Timeout {
            url: url.to_string(),
        }
    } else {
        PageError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
