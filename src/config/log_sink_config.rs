//! Prediction log configuration parsing from environment variables.

use crate::application::forecast::log_sink::DEFAULT_QUEUE_CAPACITY;
use anyhow::{Context, Result, ensure};
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/forecast_logs.db";

#[derive(Debug, Clone)]
pub struct LogSinkEnvConfig {
    pub enabled: bool,
    pub database_url: String,
    pub queue_capacity: usize,
}

impl LogSinkEnvConfig {
    pub fn from_env() -> Result<Self> {
        let enabled = env::var("PREDICTION_LOG_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let queue_capacity = env::var("PREDICTION_LOG_QUEUE")
            .unwrap_or_else(|_| DEFAULT_QUEUE_CAPACITY.to_string())
            .parse::<usize>()
            .context("Failed to parse PREDICTION_LOG_QUEUE")?;
        ensure!(queue_capacity > 0, "PREDICTION_LOG_QUEUE must be greater than 0");

        Ok(Self {
            enabled,
            database_url,
            queue_capacity,
        })
    }
}
