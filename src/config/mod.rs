//! Configuration module for the forecast service.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server, Models, Prediction Log, and Observability.

mod log_sink_config;
mod model_config;
mod observability_config;
mod server_config;

pub use log_sink_config::{DEFAULT_DATABASE_URL, LogSinkEnvConfig};
pub use model_config::{DEFAULT_MODEL_DIR, ModelEnvConfig};
pub use observability_config::ObservabilityEnvConfig;
pub use server_config::{ServerEnvConfig, parse_origins};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main application configuration.
///
/// Aggregates all sub-configs into flat fields for the rest of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,

    // Models
    pub model_dir: PathBuf,

    // Prediction log
    pub prediction_log_enabled: bool,
    pub database_url: String,
    pub prediction_log_queue: usize,

    // Observability
    pub observability_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let server = ServerEnvConfig::from_env().context("Failed to load server config")?;
        let models = ModelEnvConfig::from_env();
        let log_sink =
            LogSinkEnvConfig::from_env().context("Failed to load prediction log config")?;
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self {
            host: server.host,
            port: server.port,
            cors_origins: server.cors_origins,

            model_dir: models.model_dir,

            prediction_log_enabled: log_sink.enabled,
            database_url: log_sink.database_url,
            prediction_log_queue: log_sink.queue_capacity,

            observability_enabled: observability.enabled,
        })
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid HOST:PORT {}:{}", self.host, self.port))
    }
}
