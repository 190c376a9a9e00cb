//! Output module for persisting and summarizing scrape results
//!
//! This module handles:
//! - Writing the aggregate collection to a JSON artifact
//! - Reading the artifact back
//! - Printing run summaries and record statistics

mod json;
pub mod stats;
mod traits;

pub use json::{read_records, JsonSink};
pub use stats::{
    print_record_statistics, print_report, record_statistics, RecordStatistics, RunReport,
};
pub use traits::{RecordSink, SinkError, SinkResult};
