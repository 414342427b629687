//! Best-effort prediction log.
//!
//! Predictions are handed to a bounded queue drained by a single writer
//! task. The prediction path only ever calls `try_send`, so a slow or
//! broken store can delay log entries or drop them, never a response.

use crate::domain::errors::LogSinkError;
use crate::domain::forecast::NewPredictionRecord;
use crate::domain::repositories::PredictionLogRepository;
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct PredictionLogger {
    sender: mpsc::Sender<NewPredictionRecord>,
    metrics: Metrics,
}

impl PredictionLogger {
    /// Starts the writer task. It stops once every logger clone is dropped
    /// and the queue has been drained.
    pub fn spawn(
        repository: Arc<dyn PredictionLogRepository>,
        capacity: usize,
        metrics: Metrics,
    ) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<NewPredictionRecord>(capacity.max(1));
        let writer_metrics = metrics.clone();

        let handle = tokio::spawn(async move {
            while let Some(record) = receiver.recv().await {
                match repository.save(&record).await {
                    Ok(id) => debug!("Logged prediction {} ({})", id, record.model),
                    Err(e) => {
                        writer_metrics.inc_log_sink_failures("write");
                        warn!("Failed to persist prediction log ({}): {:#}", record.model, e);
                    }
                }
            }
            debug!("Prediction log writer stopped");
        });

        (Self { sender, metrics }, handle)
    }

    pub fn try_submit(&self, record: NewPredictionRecord) -> Result<(), LogSinkError> {
        self.sender.try_send(record).map_err(|e| match e {
            TrySendError::Full(_) => LogSinkError::QueueFull,
            TrySendError::Closed(_) => LogSinkError::Closed,
        })
    }

    /// Enqueues a record. Returns whether it was accepted; failures are
    /// counted and logged here and go no further.
    pub fn submit(&self, record: NewPredictionRecord) -> bool {
        match self.try_submit(record) {
            Ok(()) => true,
            Err(e) => {
                self.metrics.inc_log_sink_failures("enqueue");
                warn!("Prediction not logged: {}", e);
                false
            }
        }
    }
}
