//! Prometheus metrics definitions for the forecast service
//!
//! All metrics use the `forecast_` prefix.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Prediction requests by model and outcome
    pub predictions_total: CounterVec,
    /// Model inference latency in seconds
    pub prediction_latency_seconds: HistogramVec,
    /// Number of models in the registry
    pub models_loaded: GenericGauge<AtomicF64>,
    /// Prediction log entries that were dropped, by stage
    pub log_sink_failures_total: CounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new(
                "forecast_predictions_total",
                "Prediction requests by model and outcome",
            ),
            &["model", "outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "forecast_prediction_latency_seconds",
                "Model inference latency in seconds",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25,
            ]),
            &["model"],
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let models_loaded = Gauge::with_opts(Opts::new(
            "forecast_models_loaded",
            "Number of forecast models loaded at startup",
        ))?;
        registry.register(Box::new(models_loaded.clone()))?;

        let log_sink_failures_total = CounterVec::new(
            Opts::new(
                "forecast_log_sink_failures_total",
                "Prediction log entries dropped, by stage (enqueue|write)",
            ),
            &["stage"],
        )?;
        registry.register(Box::new(log_sink_failures_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            prediction_latency_seconds,
            models_loaded,
            log_sink_failures_total,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_predictions(&self, model: &str, outcome: &str) {
        self.predictions_total
            .with_label_values(&[model, outcome])
            .inc();
    }

    pub fn predictions(&self, model: &str, outcome: &str) -> f64 {
        self.predictions_total
            .with_label_values(&[model, outcome])
            .get()
    }

    pub fn observe_prediction_latency(&self, model: &str, seconds: f64) {
        self.prediction_latency_seconds
            .with_label_values(&[model])
            .observe(seconds);
    }

    pub fn inc_log_sink_failures(&self, stage: &str) {
        self.log_sink_failures_total
            .with_label_values(&[stage])
            .inc();
    }

    pub fn log_sink_failures(&self, stage: &str) -> f64 {
        self.log_sink_failures_total
            .with_label_values(&[stage])
            .get()
    }
}
