//! Batch aggregation
//!
//! Drains the completion channel and concatenates batches in the order they
//! arrive. Arrival order depends on network latency, so records from a later
//! page can precede those from an earlier one; nothing here reorders them.

use crate::record::{PageBatch, Record};
use tokio::sync::mpsc;

/// Everything the aggregator collected
#[derive(Debug, Default)]
pub struct Aggregate {
    /// All records, in receipt order
    pub records: Vec<Record>,

    /// Number of batches received
    pub batches_received: usize,

    /// Number of received batches that contained no records
    pub empty_batches: usize,

    /// Page indices in the order their batches arrived
    pub arrival_order: Vec<usize>,
}

/// Receives exactly `expected` batches and concatenates them
///
/// Empty batches count toward `expected` like any other. If the channel
/// closes early (a task died before sending) aggregation stops with what it
/// has instead of waiting forever.
pub async fn aggregate(rx: &mut mpsc::Receiver<PageBatch>, expected: usize) -> Aggregate {
    let mut aggregate = Aggregate::default();

    for received in 1..=expected {
        let batch = match rx.recv().await {
            Some(batch) => batch,
            None => {
                tracing::warn!(
                    "Completion channel closed after {} of {} batches",
                    received - 1,
                    expected
                );
                break;
            }
        };

        println!(
            "Collected batch {}/{} (page {}, {} records)",
            received,
            expected,
            batch.page_index + 1,
            batch.len()
        );

        if batch.is_empty() {
            aggregate.empty_batches += 1;
        }
        aggregate.batches_received += 1;
        aggregate.arrival_order.push(batch.page_index);
        aggregate.records.extend(batch.records);
    }

    aggregate
}
