use crate::domain::ml::{FeatureVector, ModelFamily};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A served prediction waiting to be written to the log store
#[derive(Debug, Clone, PartialEq)]
pub struct NewPredictionRecord {
    pub model: String,
    pub lag1: f64,
    pub lag2: f64,
    pub lag3: f64,
    pub prediction: f64,
    pub created_at: DateTime<Utc>,
}

impl NewPredictionRecord {
    pub fn new(model: ModelFamily, features: &FeatureVector, prediction: f64) -> Self {
        Self {
            model: model.name().to_string(),
            lag1: features.lag1(),
            lag2: features.lag2(),
            lag3: features.lag3(),
            prediction,
            created_at: Utc::now(),
        }
    }
}

/// A persisted prediction, as returned by the recent-predictions query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub model: String,
    pub lag1: f64,
    pub lag2: f64,
    pub lag3: f64,
    pub prediction: f64,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn from_new(id: i64, record: &NewPredictionRecord) -> Self {
        Self {
            id,
            model: record.model.clone(),
            lag1: record.lag1,
            lag2: record.lag2,
            lag3: record.lag3,
            prediction: record.prediction,
            created_at: record.created_at,
        }
    }
}
