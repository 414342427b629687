#![allow(dead_code)]

use sales_forecast::application::forecast::PredictionService;
use sales_forecast::application::ml::gradient_boosting::GradientBoostingParameters;
use sales_forecast::application::ml::training::{
    ForestParameters, LagDataset, TrainingParameters, fit_model,
};
use sales_forecast::application::ml::{ForecastModel, ModelRegistry};
use sales_forecast::domain::ml::{FeatureVector, ModelFamily};
use sales_forecast::infrastructure::observability::Metrics;
use std::sync::Arc;

/// Known linear relationship the fixtures are fitted on.
pub fn target(lag1: f64, lag2: f64, lag3: f64) -> f64 {
    0.7 * lag1 + 0.2 * lag2 + 0.1 * lag3
}

/// Every lag triple over 10k..=40k in 5k steps.
pub fn grid_dataset() -> LagDataset {
    let values: Vec<f64> = (0..7).map(|i| 10_000.0 + 5_000.0 * i as f64).collect();
    let mut dataset = LagDataset::default();
    for &l1 in &values {
        for &l2 in &values {
            for &l3 in &values {
                dataset.features.push(FeatureVector::new(l1, l2, l3).unwrap());
                dataset.targets.push(target(l1, l2, l3));
            }
        }
    }
    dataset
}

/// Small enough to fit quickly, large enough to follow the target.
pub fn fast_params() -> TrainingParameters {
    TrainingParameters {
        horizon: 3,
        forest: ForestParameters {
            n_trees: 20,
            ..ForestParameters::default()
        },
        boosting: GradientBoostingParameters::default()
            .with_n_rounds(60)
            .with_learning_rate(0.2),
    }
}

pub fn fit(family: ModelFamily) -> ForecastModel {
    fit_model(family, &grid_dataset(), &fast_params()).unwrap()
}

pub fn full_registry() -> Arc<ModelRegistry> {
    Arc::new(ModelRegistry::from_models(
        ModelFamily::ALL.into_iter().map(fit),
    ))
}

pub fn empty_registry() -> Arc<ModelRegistry> {
    Arc::new(ModelRegistry::from_models(Vec::new()))
}

pub fn service(registry: Arc<ModelRegistry>) -> PredictionService {
    PredictionService::new(registry, Metrics::new().unwrap())
}
