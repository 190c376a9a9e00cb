//! Launcher for page tasks
//!
//! This module handles:
//! - Spawning one task per page request, in page order
//! - Pacing launches with a fixed delay between consecutive spawns
//! - Bounding concurrent requests via a semaphore
//!
//! The delay throttles *launches*, not requests: a slow page keeps running
//! while later pages start, so several requests can be in flight at once
//! (up to the semaphore limit).

use crate::config::FetchConfig;
use crate::record::PageBatch;
use crate::url::PageRequest;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

/// Spawns page tasks at a fixed cadence
pub struct Launcher {
    /// Pause between consecutive launches
    delay: Duration,

    /// Global semaphore for limiting concurrent fetches
    permits: Arc<Semaphore>,
}

impl Launcher {
    /// Creates a launcher with the given cadence and concurrency bound
    ///
    /// A `max_in_flight` of zero is treated as one.
    pub fn new(delay: Duration, max_in_flight: usize) -> Self {
        Self {
            delay,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(config.launch_delay(), config.max_in_flight as usize)
    }

    /// Spawns one task per request and returns how many were launched
    ///
    /// Each spawned task waits for a permit, runs `task`, and sends exactly
    /// one batch on `tx`. The launcher's own sender is dropped on return, so
    /// the channel closes once every task has finished.
    ///
    /// Launching never fails.
    pub async fn launch<F, Fut>(
        &self,
        requests: Vec<PageRequest>,
        tx: mpsc::Sender<PageBatch>,
        task: F,
    ) -> usize
    where
        F: Fn(PageRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PageBatch> + Send + 'static,
    {
        let total = requests.len();
        let task = Arc::new(task);

        for (position, request) in requests.into_iter().enumerate() {
            tracing::debug!("Launching page {}: {}", request.index, request.url);

            let permits = Arc::clone(&self.permits);
            let tx = tx.clone();
            let task = Arc::clone(&task);

            tokio::spawn(async move {
                let index = request.index;
                let batch = match permits.acquire_owned().await {
                    Ok(_permit) => task(request).await,
                    Err(e) => {
                        tracing::warn!("Page {} could not acquire a fetch permit: {}", index, e);
                        PageBatch::empty(index)
                    }
                };

                if tx.send(batch).await.is_err() {
                    tracing::debug!("Receiver dropped before page {} was collected", index);
                }
            });

            if position + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        total
    }
}
