use crate::application::ml::gradient_boosting::GradientBoostedTrees;
use crate::domain::errors::ForecastError;
use crate::domain::ml::feature_registry::features_to_f64_vector;
use crate::domain::ml::{FeatureVector, ModelFamily};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;

pub type ForestRegressor = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// A trained forecast model. One variant per [`ModelFamily`].
///
/// Parameters never change after loading, and `predict` only reads them,
/// so a model can be shared across concurrent requests without locking.
#[derive(Serialize, Deserialize)]
#[serde(tag = "family", content = "params")]
pub enum ForecastModel {
    #[serde(rename = "rf")]
    RandomForest(ForestRegressor),
    #[serde(rename = "xgb")]
    GradientBoosting(GradientBoostedTrees),
}

impl ForecastModel {
    pub fn family(&self) -> ModelFamily {
        match self {
            ForecastModel::RandomForest(_) => ModelFamily::RandomForest,
            ForecastModel::GradientBoosting(_) => ModelFamily::GradientBoosting,
        }
    }

    /// Predicts next-period sales from `[lag1, lag2, lag3]`, in that order.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, ForecastError> {
        let row = DenseMatrix::from_2d_vec(&vec![features_to_f64_vector(features)])
            .map_err(|e| self.failure(format!("Matrix creation failed: {}", e)))?;

        let value = self
            .predict_rows(&row)
            .map_err(|e| self.failure(e))?
            .first()
            .copied()
            .ok_or_else(|| self.failure("No prediction returned"))?;

        if !value.is_finite() {
            return Err(self.failure(format!("non-finite output {}", value)));
        }
        Ok(value)
    }

    /// Predicts one value per row. Used for holdout evaluation.
    pub fn predict_rows(&self, rows: &DenseMatrix<f64>) -> Result<Vec<f64>, String> {
        let output = match self {
            ForecastModel::RandomForest(model) => model.predict(rows),
            ForecastModel::GradientBoosting(model) => model.predict(rows),
        };
        output.map_err(|e| format!("Prediction failed: {}", e))
    }

    fn failure(&self, reason: impl Into<String>) -> ForecastError {
        ForecastError::ModelFailure {
            model: self.family().name().to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Debug for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastModel::RandomForest(_) => f.write_str("ForecastModel::RandomForest"),
            ForecastModel::GradientBoosting(model) => {
                write!(f, "ForecastModel::GradientBoosting({} trees)", model.n_trees())
            }
        }
    }
}
