//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementation of `PredictionLogRepository`.
//! Used by tests and by deployments that want the recent-predictions
//! endpoint without a database file. Data is lost on restart.

use crate::domain::forecast::{NewPredictionRecord, PredictionRecord};
use crate::domain::repositories::PredictionLogRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryPredictionLogRepository {
    records: Arc<RwLock<Vec<PredictionRecord>>>,
}

impl InMemoryPredictionLogRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryPredictionLogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionLogRepository for InMemoryPredictionLogRepository {
    async fn save(&self, record: &NewPredictionRecord) -> Result<i64> {
        let mut records = self.records.write().await;
        let id = records.len() as i64 + 1;
        records.push(PredictionRecord::from_new(id, record));
        Ok(id)
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
