//! Offline training pipeline.
//!
//! Monthly aggregation, lag windows, holdout split, fitting and evaluation.
//! The serving side only depends on the artifact this produces: the family
//! name and the `[lag_1, lag_2, lag_3]` input order.

use crate::application::ml::artifact::{HoldoutMetrics, ModelArtifact, TrainingSummary};
use crate::application::ml::forecast_model::{ForecastModel, ForestRegressor};
use crate::application::ml::gradient_boosting::{GradientBoostedTrees, GradientBoostingParameters};
use crate::domain::errors::TrainingError;
use crate::domain::forecast::{MonthlySales, SaleRecord};
use crate::domain::ml::feature_registry::{FEATURE_NAMES, features_to_f64_vector};
use crate::domain::ml::{FeatureVector, ModelFamily};
use chrono::{Datelike, NaiveDate};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;
use smartcore::linalg::basic::matrix::DenseMatrix;
use statrs::statistics::{Data, Distribution};
use std::collections::BTreeMap;

/// Random forest hyperparameters
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParameters {
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    /// Features considered at each split
    pub m: usize,
    pub seed: u64,
}

impl Default for ForestParameters {
    fn default() -> Self {
        Self {
            n_trees: 300,
            max_depth: None,
            min_samples_split: 2,
            m: FEATURE_NAMES.len(),
            seed: 42,
        }
    }
}

impl ForestParameters {
    fn to_smartcore(&self) -> RandomForestRegressorParameters {
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.n_trees)
            .with_min_samples_split(self.min_samples_split)
            .with_m(self.m)
            .with_seed(self.seed);
        match self.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingParameters {
    /// Number of trailing lag windows held out for evaluation
    pub horizon: usize,
    pub forest: ForestParameters,
    pub boosting: GradientBoostingParameters,
}

impl Default for TrainingParameters {
    fn default() -> Self {
        Self {
            horizon: 3,
            forest: ForestParameters::default(),
            boosting: GradientBoostingParameters::default(),
        }
    }
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month(month: NaiveDate) -> Option<NaiveDate> {
    let (year, m) = if month.month() == 12 {
        (month.year() + 1, 1)
    } else {
        (month.year(), month.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, m, 1)
}

/// Sums sales per calendar month. Months without orders between the first
/// and last month are present with zero sales.
pub fn monthly_aggregate(records: &[SaleRecord]) -> Vec<MonthlySales> {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        *buckets.entry(month_start(record.order_date)).or_insert(0.0) += record.sales;
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut series = Vec::with_capacity(buckets.len());
    let mut cursor = Some(first);
    while let Some(month) = cursor.filter(|m| *m <= last) {
        series.push(MonthlySales {
            month,
            sales: buckets.get(&month).copied().unwrap_or(0.0),
        });
        cursor = next_month(month);
    }
    series
}

/// Supervised rows: features are the three preceding months, target is the current month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LagDataset {
    pub months: Vec<NaiveDate>,
    pub features: Vec<FeatureVector>,
    pub targets: Vec<f64>,
}

impl LagDataset {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn to_matrix(&self) -> Result<DenseMatrix<f64>, TrainingError> {
        let rows: Vec<Vec<f64>> = self.features.iter().map(features_to_f64_vector).collect();
        DenseMatrix::from_2d_vec(&rows).map_err(|e| TrainingError::Matrix(e.to_string()))
    }

    fn split_at(mut self, at: usize) -> (LagDataset, LagDataset) {
        let tail = LagDataset {
            months: self.months.split_off(at),
            features: self.features.split_off(at),
            targets: self.targets.split_off(at),
        };
        (self, tail)
    }
}

pub fn build_lag_dataset(series: &[MonthlySales]) -> Result<LagDataset, TrainingError> {
    let n_lags = FEATURE_NAMES.len();
    if series.len() <= n_lags {
        return Err(TrainingError::InsufficientData {
            needed: n_lags + 1,
            got: series.len(),
            unit: "months",
        });
    }

    let mut dataset = LagDataset::default();
    for window in series.windows(n_lags + 1) {
        let current = &window[n_lags];
        let features = FeatureVector::new(window[2].sales, window[1].sales, window[0].sales)
            .map_err(|e| TrainingError::InvalidSeries(e.to_string()))?;
        if !current.sales.is_finite() {
            return Err(TrainingError::InvalidSeries(format!(
                "non-finite sales for {}",
                current.month
            )));
        }
        dataset.months.push(current.month);
        dataset.features.push(features);
        dataset.targets.push(current.sales);
    }
    Ok(dataset)
}

/// Holds out the last `horizon` rows, always keeping at least one training row.
pub fn split_holdout(dataset: LagDataset, horizon: usize) -> (LagDataset, LagDataset) {
    let len = dataset.len();
    let train_size = len.saturating_sub(horizon).max(1).min(len);
    dataset.split_at(train_size)
}

pub fn fit_model(
    family: ModelFamily,
    train: &LagDataset,
    params: &TrainingParameters,
) -> Result<ForecastModel, TrainingError> {
    if train.is_empty() {
        return Err(TrainingError::InsufficientData {
            needed: 1,
            got: 0,
            unit: "training rows",
        });
    }
    let x = train.to_matrix()?;

    match family {
        ModelFamily::RandomForest => {
            let model = ForestRegressor::fit(&x, &train.targets, params.forest.to_smartcore())
                .map_err(|e| TrainingError::Fit(e.to_string()))?;
            Ok(ForecastModel::RandomForest(model))
        }
        ModelFamily::GradientBoosting => {
            let model = GradientBoostedTrees::fit(&x, &train.targets, &params.boosting)?;
            Ok(ForecastModel::GradientBoosting(model))
        }
    }
}

/// Fixed-weight reference forecast used to judge whether a model is worth serving.
pub fn baseline_forecast(features: &FeatureVector) -> f64 {
    0.5 * features.lag1() + 0.3 * features.lag2() + 0.2 * features.lag3()
}

pub fn holdout_metrics(forecasts: &[f64], actuals: &[f64]) -> Option<HoldoutMetrics> {
    let n = forecasts.len().min(actuals.len());
    if n == 0 {
        return None;
    }

    let pairs = || forecasts.iter().zip(actuals.iter());
    let sq_err: f64 = pairs().map(|(f, a)| (f - a).powi(2)).sum();
    let abs_err: f64 = pairs().map(|(f, a)| (f - a).abs()).sum();

    let pct: Vec<f64> = pairs()
        .filter(|(_, a)| **a != 0.0)
        .map(|(f, a)| ((f - a) / a).abs())
        .collect();
    let mape = if pct.is_empty() {
        None
    } else {
        Some(pct.iter().sum::<f64>() / pct.len() as f64 * 100.0)
    };

    Some(HoldoutMetrics {
        n,
        rmse: (sq_err / n as f64).sqrt(),
        mae: abs_err / n as f64,
        mape,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub months: usize,
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub mean: f64,
    pub std_dev: Option<f64>,
}

pub fn summarize_series(series: &[MonthlySales]) -> Option<SeriesSummary> {
    let first = series.first()?.month;
    let last = series.last()?.month;
    let data = Data::new(series.iter().map(|m| m.sales).collect::<Vec<f64>>());
    let mean = data.mean()?;
    let std_dev = data.std_dev().filter(|s| s.is_finite());
    Some(SeriesSummary {
        months: series.len(),
        first,
        last,
        mean,
        std_dev,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutPoint {
    pub month: NaiveDate,
    pub actual: f64,
    pub forecast: f64,
    pub baseline: f64,
}

#[derive(Debug)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub holdout: Vec<HoldoutPoint>,
    pub baseline: Option<HoldoutMetrics>,
}

/// Runs the whole pipeline for one family on an aggregated monthly series.
pub fn train_family(
    family: ModelFamily,
    series: &[MonthlySales],
    params: &TrainingParameters,
) -> Result<TrainingOutcome, TrainingError> {
    let dataset = build_lag_dataset(series)?;
    let (train, test) = split_holdout(dataset, params.horizon);
    let model = fit_model(family, &train, params)?;

    let mut holdout = Vec::with_capacity(test.len());
    if !test.is_empty() {
        let forecasts = model
            .predict_rows(&test.to_matrix()?)
            .map_err(TrainingError::Predict)?;
        for (i, forecast) in forecasts.into_iter().enumerate() {
            holdout.push(HoldoutPoint {
                month: test.months[i],
                actual: test.targets[i],
                forecast,
                baseline: baseline_forecast(&test.features[i]),
            });
        }
    }

    let actuals: Vec<f64> = holdout.iter().map(|p| p.actual).collect();
    let forecasts: Vec<f64> = holdout.iter().map(|p| p.forecast).collect();
    let baselines: Vec<f64> = holdout.iter().map(|p| p.baseline).collect();

    let summary = TrainingSummary {
        train_samples: train.len(),
        test_samples: test.len(),
        horizon: params.horizon,
        holdout: holdout_metrics(&forecasts, &actuals),
    };

    Ok(TrainingOutcome {
        artifact: ModelArtifact::new(model, summary),
        holdout,
        baseline: holdout_metrics(&baselines, &actuals),
    })
}
