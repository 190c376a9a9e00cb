//! Run reports and artifact statistics
//!
//! This module provides the end-of-run summary printed after a scrape, and
//! simple statistics over an existing JSON artifact.

use crate::record::Record;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Summary of one scrape run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Wall-clock time the run started
    pub started_at: DateTime<Utc>,

    /// Number of page tasks launched
    pub pages_launched: usize,

    /// Number of batches the aggregator received
    pub batches_received: usize,

    /// Received batches that held no records (failed or empty pages)
    pub empty_batches: usize,

    /// Total records collected
    pub records: usize,

    /// Elapsed wall time for the whole run
    pub elapsed: Duration,

    /// Where the artifact was written, if the write succeeded
    pub persisted_to: Option<PathBuf>,
}

impl RunReport {
    /// Records expected if every page were full
    pub fn nominal_records(&self, page_size: usize) -> usize {
        self.pages_launched * page_size
    }
}

/// Prints the run summary to stdout
pub fn print_report(report: &RunReport) {
    println!(
        "Run started {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    match &report.persisted_to {
        Some(path) => println!("Saved to {}", path.display()),
        None => println!("Results were not saved"),
    }

    if report.empty_batches > 0 {
        println!(
            "{} of {} pages contributed no records",
            report.empty_batches, report.pages_launched
        );
    }

    println!(
        "✓ Scrape complete: {} records in {:.2?}",
        report.records, report.elapsed
    );
}

/// Statistics over a set of records
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStatistics {
    /// Total number of records
    pub total_records: usize,

    /// Records whose title is empty
    pub untitled_records: usize,

    /// Records where every field is empty
    pub blank_records: usize,

    /// Mean of the ratings that parse as numbers
    pub mean_rating: Option<f64>,
}

/// Computes statistics over a record collection
pub fn record_statistics(records: &[Record]) -> RecordStatistics {
    let ratings: Vec<f64> = records
        .iter()
        .filter_map(|r| r.rating.trim().parse::<f64>().ok())
        .collect();

    let mean_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };

    RecordStatistics {
        total_records: records.len(),
        untitled_records: records.iter().filter(|r| r.title.is_empty()).count(),
        blank_records: records.iter().filter(|r| r.is_blank()).count(),
        mean_rating,
    }
}

/// Prints record statistics to stdout in a formatted manner
pub fn print_record_statistics(stats: &RecordStatistics) {
    println!("=== Record Statistics ===\n");
    println!("  Total records: {}", stats.total_records);
    println!("  Without title: {}", stats.untitled_records);
    println!("  Entirely blank: {}", stats.blank_records);

    match stats.mean_rating {
        Some(mean) => println!("  Mean rating: {:.2}", mean),
        None => println!("  Mean rating: n/a"),
    }
}
