use std::path::PathBuf;
use thiserror::Error;

fn names_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Request-scoped failures of the prediction path.
///
/// None of these leave process state behind; the caller may retry freely.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Model '{requested}' not found. Available models: {}", names_or_none(.available))]
    ModelNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("Model '{model}' failed to predict: {reason}")]
    ModelFailure { model: String, reason: String },
}

impl ForecastError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        ForecastError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable identifier of the failure kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::InvalidInput { .. } => "InvalidInput",
            ForecastError::ModelNotFound { .. } => "ModelNotFound",
            ForecastError::ModelFailure { .. } => "ModelFailure",
        }
    }
}

/// Errors raised while reading or validating a persisted model artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found at {path:?}")]
    Missing { path: PathBuf },

    #[error("Failed to read artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Artifact {path:?} is incompatible: {reason}")]
    Incompatible { path: PathBuf, reason: String },
}

/// Errors related to the model registry as a whole
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No model artifacts could be loaded from {dir:?} ({skipped} skipped)")]
    RegistryLoadFailure { dir: PathBuf, skipped: usize },
}

/// Errors raised by the offline training pipeline
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Not enough data: need at least {needed} {unit}, got {got}")]
    InsufficientData {
        needed: usize,
        got: usize,
        unit: &'static str,
    },

    #[error("Invalid sales series: {0}")]
    InvalidSeries(String),

    #[error("Matrix construction failed: {0}")]
    Matrix(String),

    #[error("Model fitting failed: {0}")]
    Fit(String),

    #[error("Holdout prediction failed: {0}")]
    Predict(String),
}

/// Errors of the best-effort prediction log.
///
/// These are counted and logged, never returned to a prediction caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogSinkError {
    #[error("Prediction log queue is full")]
    QueueFull,

    #[error("Prediction log writer has stopped")]
    Closed,
}
