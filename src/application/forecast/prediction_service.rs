use crate::application::forecast::log_sink::PredictionLogger;
use crate::application::ml::ModelRegistry;
use crate::domain::errors::ForecastError;
use crate::domain::forecast::NewPredictionRecord;
use crate::domain::ml::FeatureVector;
use crate::infrastructure::observability::Metrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Raw prediction query, exactly as supplied by the caller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionRequest {
    pub lag1: Option<String>,
    pub lag2: Option<String>,
    pub lag3: Option<String>,
    pub model: Option<String>,
}

impl PredictionRequest {
    pub fn new(lag1: &str, lag2: &str, lag3: &str, model: &str) -> Self {
        Self {
            lag1: Some(lag1.to_string()),
            lag2: Some(lag2.to_string()),
            lag3: Some(lag3.to_string()),
            model: Some(model.to_string()),
        }
    }
}

/// A successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub prediction: f64,
    pub model: String,
    /// Whether the prediction was handed to the log sink
    pub logged: bool,
}

/// Stateless request handler over a shared, read-only registry.
#[derive(Clone)]
pub struct PredictionService {
    registry: Arc<ModelRegistry>,
    logger: Option<PredictionLogger>,
    metrics: Metrics,
}

impl PredictionService {
    pub fn new(registry: Arc<ModelRegistry>, metrics: Metrics) -> Self {
        Self {
            registry,
            logger: None,
            metrics,
        }
    }

    pub fn with_logger(mut self, logger: PredictionLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Validates the raw request, lags first, then the model name.
    pub fn predict(&self, request: &PredictionRequest) -> Result<Forecast, ForecastError> {
        let features = FeatureVector::parse(
            request.lag1.as_deref(),
            request.lag2.as_deref(),
            request.lag3.as_deref(),
        )
        .inspect_err(|_| self.metrics.inc_predictions("none", "invalid_input"))?;

        let model_name = request
            .model
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ForecastError::invalid_input("model", "value is required"))
            .inspect_err(|_| self.metrics.inc_predictions("none", "invalid_input"))?;

        self.predict_features(&features, model_name)
    }

    pub fn predict_values(
        &self,
        lag1: f64,
        lag2: f64,
        lag3: f64,
        model_name: &str,
    ) -> Result<Forecast, ForecastError> {
        let features = FeatureVector::new(lag1, lag2, lag3)
            .inspect_err(|_| self.metrics.inc_predictions("none", "invalid_input"))?;
        self.predict_features(&features, model_name)
    }

    pub fn predict_features(
        &self,
        features: &FeatureVector,
        model_name: &str,
    ) -> Result<Forecast, ForecastError> {
        let started = Instant::now();

        let model = self
            .registry
            .get(model_name)
            .inspect_err(|_| self.metrics.inc_predictions("unknown", "model_not_found"))?;
        let family = model.family();

        let prediction = model
            .predict(features)
            .inspect_err(|_| self.metrics.inc_predictions(family.name(), "model_failure"))?;

        self.metrics.inc_predictions(family.name(), "ok");
        self.metrics
            .observe_prediction_latency(family.name(), started.elapsed().as_secs_f64());
        debug!(
            "Predicted {:.2} with '{}' from {:?}",
            prediction,
            family,
            features.lags()
        );

        let logged = self
            .logger
            .as_ref()
            .map(|logger| logger.submit(NewPredictionRecord::new(family, features, prediction)))
            .unwrap_or(false);

        Ok(Forecast {
            prediction,
            model: family.name().to_string(),
            logged,
        })
    }
}
