//! Sales forecast server
//!
//! Loads every trained model artifact from `MODEL_DIR` once at startup and
//! serves next-month sales predictions over HTTP.
//!
//! # Usage
//! ```sh
//! MODEL_DIR=reports/models PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `MODEL_DIR` - Directory holding `sales_forecast_<model>.json` artifacts (default: reports/models)
//! - `PREDICTION_LOG_ENABLED` - Persist every prediction (default: true)
//! - `DATABASE_URL` - SQLite prediction log (default: sqlite://data/forecast_logs.db)
//! - `OBSERVABILITY_ENABLED` - Serve Prometheus metrics on `/metrics` (default: true)

use anyhow::{Context, Result};
use sales_forecast::application::forecast::{PredictionLogger, PredictionService};
use sales_forecast::application::ml::ModelRegistry;
use sales_forecast::config::Config;
use sales_forecast::domain::repositories::PredictionLogRepository;
use sales_forecast::infrastructure::observability::Metrics;
use sales_forecast::infrastructure::persistence::{Database, SqlitePredictionLogRepository};
use sales_forecast::interfaces::http::{self, AppState, RouterOptions};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{Level, error, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Sales forecast server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: ModelDir={:?}, PredictionLog={}, Metrics={}",
        config.model_dir, config.prediction_log_enabled, config.observability_enabled
    );

    let metrics = Metrics::new()?;

    let registry = ModelRegistry::load_all(&config.model_dir);
    if let Err(e) = registry.ensure_usable() {
        // Keep serving: /health reports degraded and every prediction is ModelNotFound.
        error!("{}", e);
    }
    metrics.models_loaded.set(registry.len() as f64);
    let registry = Arc::new(registry);

    let mut service = PredictionService::new(registry, metrics.clone());
    let mut log_store: Option<Arc<dyn PredictionLogRepository>> = None;
    let mut writer: Option<JoinHandle<()>> = None;

    if config.prediction_log_enabled {
        match Database::new(&config.database_url).await {
            Ok(db) => {
                let repository: Arc<dyn PredictionLogRepository> =
                    Arc::new(SqlitePredictionLogRepository::new(db.pool.clone()));
                let (logger, handle) = PredictionLogger::spawn(
                    repository.clone(),
                    config.prediction_log_queue,
                    metrics.clone(),
                );
                service = service.with_logger(logger);
                log_store = Some(repository);
                writer = Some(handle);
            }
            Err(e) => warn!("Prediction log disabled, database unavailable: {:#}", e),
        }
    } else {
        info!("Prediction log disabled.");
    }

    let options = RouterOptions {
        cors_origins: config.cors_origins.clone(),
        expose_metrics: config.observability_enabled,
    };
    let app = http::router(
        AppState {
            service,
            log_store,
            metrics,
        },
        &options,
    );

    let addr = config.bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received.");
        })
        .await
        .context("Server error")?;

    // The router (and every logger clone) is gone; let the writer drain the queue.
    if let Some(handle) = writer
        && let Err(e) = handle.await
    {
        warn!("Prediction log writer ended abnormally: {}", e);
    }

    info!("Server stopped.");
    Ok(())
}
