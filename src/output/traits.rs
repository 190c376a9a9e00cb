//! Sink traits and errors
//!
//! This module defines the trait interface for record sinks and the errors a
//! sink can report back to the driver.

use crate::record::Record;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting or reading the artifact
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create output directory {}: {}", .path.display(), .source)]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode or decode records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for the aggregate collection
///
/// Sinks serialize without mutating the records and return failures to the
/// caller, which decides whether a failed write is fatal.
pub trait RecordSink {
    /// Persists the records in the given order
    fn persist(&self, records: &[Record]) -> SinkResult<()>;

    /// Human-readable description of where records go
    fn destination(&self) -> String;
}
