//! Repository Pattern Abstractions
//!
//! The prediction log is the only persisted state of the service. The
//! trait below keeps the prediction path independent from the storage
//! that backs it (SQLite in production, in-memory in tests).

use crate::domain::forecast::{NewPredictionRecord, PredictionRecord};
use anyhow::Result;
use async_trait::async_trait;

/// Repository for persisting and retrieving served predictions
#[async_trait]
pub trait PredictionLogRepository: Send + Sync {
    /// Save a prediction, returning its assigned id
    async fn save(&self, record: &NewPredictionRecord) -> Result<i64>;

    /// Find the most recent predictions, newest first
    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>>;

    /// Count total number of logged predictions
    async fn count(&self) -> Result<usize>;
}
