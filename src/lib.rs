//! Ranklist-Scraper: a polite paginated listing harvester
//!
//! This crate fetches a fixed number of paginated HTML listing pages
//! concurrently, extracts one record per list item, and writes the
//! aggregate to a JSON artifact.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod url;

use thiserror::Error;

/// Main error type for Ranklist-Scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Extractor error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Sink error: {0}")]
    Sink(#[from] output::SinkError),
}

/// Failure of a single page task
///
/// These never escape the fetcher: a failed page contributes an empty batch.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTML parse error for {url}: {source}")]
    Parse { url: String, source: ExtractError },
}

/// Errors raised while turning a document into records
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("List container '{0}' not found in document")]
    MissingContainer(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL template in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL template is missing the {{start}} placeholder: {0}")]
    MissingPlaceholder(String),
}

/// Result type alias for Ranklist-Scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{PageBatch, Record};
pub use crate::url::{build_page_url, page_requests, PageRequest};
