use crate::application::ml::forecast_model::ForecastModel;
use crate::domain::ml::ModelFamily;
use crate::domain::ml::feature_registry::{feature_names, matches_feature_names};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bumped when the envelope layout changes incompatibly.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Holdout error metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldoutMetrics {
    pub n: usize,
    pub rmse: f64,
    pub mae: f64,
    /// Undefined when every actual value is zero
    pub mape: Option<f64>,
}

/// What the model was fitted on, kept alongside the parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub train_samples: usize,
    pub test_samples: usize,
    pub horizon: usize,
    pub holdout: Option<HoldoutMetrics>,
}

/// Persisted form of a trained model
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub trained_at: DateTime<Utc>,
    pub training: TrainingSummary,
    pub model: ForecastModel,
}

impl ModelArtifact {
    pub fn new(model: ForecastModel, training: TrainingSummary) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_names: feature_names(),
            trained_at: Utc::now(),
            training,
            model,
        }
    }

    pub fn family(&self) -> ModelFamily {
        self.model.family()
    }

    /// Checks the envelope against what the serving side expects.
    pub fn check_compatible(&self, expected: ModelFamily) -> Result<(), String> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(format!(
                "format version {} is not supported (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            ));
        }
        if !matches_feature_names(&self.feature_names) {
            return Err(format!(
                "feature order {:?} does not match the serving order",
                self.feature_names
            ));
        }
        if self.family() != expected {
            return Err(format!(
                "holds a '{}' model but is named for '{}'",
                self.family(),
                expected
            ));
        }
        Ok(())
    }
}
