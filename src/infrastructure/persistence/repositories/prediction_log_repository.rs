use crate::domain::forecast::{NewPredictionRecord, PredictionRecord};
use crate::domain::repositories::PredictionLogRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use sqlx::{Row, SqlitePool};

pub struct SqlitePredictionLogRepository {
    pool: SqlitePool,
}

impl SqlitePredictionLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PredictionLogRepository for SqlitePredictionLogRepository {
    async fn save(&self, record: &NewPredictionRecord) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO forecast_logs (model, lag1, lag2, lag3, prediction, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.model)
        .bind(record.lag1)
        .bind(record.lag2)
        .bind(record.lag3)
        .bind(record.prediction)
        .bind(record.created_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .context("Failed to save prediction log")?;

        Ok(result.last_insert_rowid())
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let rows = sqlx::query("SELECT * FROM forecast_logs ORDER BY id DESC LIMIT ?")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let created_ms: i64 = row.try_get("created_at")?;
            let created_at = DateTime::from_timestamp_millis(created_ms)
                .with_context(|| format!("Invalid created_at timestamp {}", created_ms))?;

            records.push(PredictionRecord {
                id: row.try_get("id")?,
                model: row.try_get("model")?,
                lag1: row.try_get("lag1")?,
                lag2: row.try_get("lag2")?,
                lag3: row.try_get("lag3")?,
                prediction: row.try_get("prediction")?,
                created_at,
            });
        }
        Ok(records)
    }

    async fn count(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM forecast_logs")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as usize)
    }
}
