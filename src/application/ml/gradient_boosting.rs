//! Gradient boosted regression trees on squared error.
//!
//! Starts from the mean target and fits each round's tree on the residuals
//! of the ensemble so far. Every tree is a smartcore `DecisionTreeRegressor`,
//! so the fitted ensemble serializes with the same serde support as the
//! random forest.

use crate::domain::errors::TrainingError;
use serde::{Deserialize, Serialize};
use smartcore::error::Failed;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

pub type RegressionTree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Boosting hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingParameters {
    pub n_rounds: usize,
    pub learning_rate: f64,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for GradientBoostingParameters {
    fn default() -> Self {
        Self {
            n_rounds: 400,
            learning_rate: 0.08,
            max_depth: 4,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl GradientBoostingParameters {
    pub fn with_n_rounds(mut self, n_rounds: usize) -> Self {
        self.n_rounds = n_rounds;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u16) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn tree_parameters(&self) -> DecisionTreeRegressorParameters {
        DecisionTreeRegressorParameters::default()
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf)
    }
}

/// A fitted boosted ensemble. Immutable once fitted.
#[derive(Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    base_score: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoostedTrees {
    pub fn fit(
        x: &DenseMatrix<f64>,
        y: &[f64],
        params: &GradientBoostingParameters,
    ) -> Result<Self, TrainingError> {
        if y.is_empty() {
            return Err(TrainingError::InsufficientData {
                needed: 1,
                got: 0,
                unit: "training rows",
            });
        }
        if !(params.learning_rate > 0.0 && params.learning_rate.is_finite()) {
            return Err(TrainingError::Fit(format!(
                "learning rate must be positive, got {}",
                params.learning_rate
            )));
        }

        let base_score = y.iter().sum::<f64>() / y.len() as f64;
        let mut fitted = vec![base_score; y.len()];
        let mut trees = Vec::with_capacity(params.n_rounds);

        for _ in 0..params.n_rounds {
            let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(t, f)| t - f).collect();
            let tree = RegressionTree::fit(x, &residuals, params.tree_parameters())
                .map_err(|e| TrainingError::Fit(e.to_string()))?;
            let update = tree
                .predict(x)
                .map_err(|e| TrainingError::Fit(e.to_string()))?;
            for (f, u) in fitted.iter_mut().zip(update) {
                *f += params.learning_rate * u;
            }
            trees.push(tree);
        }

        Ok(Self {
            base_score,
            learning_rate: params.learning_rate,
            trees,
        })
    }

    /// Predicts one value per row of `x`.
    pub fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>, Failed> {
        let mut output: Option<Vec<f64>> = None;
        for tree in &self.trees {
            let update = tree.predict(x)?;
            let acc = output.get_or_insert_with(|| vec![self.base_score; update.len()]);
            for (o, u) in acc.iter_mut().zip(update) {
                *o += self.learning_rate * u;
            }
        }
        match output {
            Some(values) => Ok(values),
            // No boosting rounds: every row gets the base score.
            None => {
                let (rows, _) = x.shape();
                Ok(vec![self.base_score; rows])
            }
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (DenseMatrix<f64>, Vec<f64>) {
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..40 {
            let a = i as f64;
            let b = (i % 7) as f64;
            rows.push(vec![a, b, 1.0]);
            y.push(3.0 * a + b);
        }
        (DenseMatrix::from_2d_vec(&rows).unwrap(), y)
    }

    #[test]
    fn test_boosting_reduces_training_error() {
        let (x, y) = linear_data();
        let params = GradientBoostingParameters::default()
            .with_n_rounds(60)
            .with_learning_rate(0.2)
            .with_max_depth(3);
        let model = GradientBoostedTrees::fit(&x, &y, &params).unwrap();
        assert_eq!(model.n_trees(), 60);

        let pred = model.predict(&x).unwrap();
        let mean = y.iter().sum::<f64>() / y.len() as f64;
        let sse_model: f64 = pred.iter().zip(&y).map(|(p, t)| (p - t).powi(2)).sum();
        let sse_mean: f64 = y.iter().map(|t| (t - mean).powi(2)).sum();
        assert!(sse_model < 0.05 * sse_mean);
    }

    #[test]
    fn test_zero_rounds_predicts_mean() {
        let (x, y) = linear_data();
        let params = GradientBoostingParameters::default().with_n_rounds(0);
        let model = GradientBoostedTrees::fit(&x, &y, &params).unwrap();
        let pred = model.predict(&x).unwrap();
        assert_eq!(pred.len(), y.len());
        assert!(pred.iter().all(|p| (*p - model.base_score()).abs() < 1e-12));
    }

    #[test]
    fn test_empty_targets_rejected() {
        let x = DenseMatrix::from_2d_vec(&vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let result = GradientBoostedTrees::fit(&x, &[], &GradientBoostingParameters::default());
        assert!(matches!(
            result,
            Err(TrainingError::InsufficientData { .. })
        ));
    }
}
