use crate::domain::ml::feature_vector::FeatureVector;

/// Ordered list of feature names.
/// This order MUST match exactly with the order used by the training pipeline.
/// Any change here is a breaking change for persisted artifacts.
pub const FEATURE_NAMES: &[&str] = &["lag_1", "lag_2", "lag_3"];

/// Query-parameter names of the lag values, in feature order.
pub const LAG_FIELDS: [&str; 3] = ["lag1", "lag2", "lag3"];

/// Converts a feature vector into the row layout the models were fitted on.
pub fn features_to_f64_vector(fv: &FeatureVector) -> Vec<f64> {
    fv.lags().to_vec()
}

/// True when a persisted feature list matches [`FEATURE_NAMES`] exactly.
pub fn matches_feature_names(names: &[String]) -> bool {
    names.len() == FEATURE_NAMES.len()
        && names
            .iter()
            .zip(FEATURE_NAMES.iter())
            .all(|(got, want)| got == want)
}

pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|name| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_length() {
        let fv = FeatureVector::new(1.0, 2.0, 3.0).unwrap();
        let vec = features_to_f64_vector(&fv);
        assert_eq!(vec.len(), FEATURE_NAMES.len());
    }

    #[test]
    fn test_feature_consistency() {
        let fv = FeatureVector::new(30000.0, 28000.0, 25000.0).unwrap();
        let vec = features_to_f64_vector(&fv);
        // Most recent period is index 0
        assert_eq!(vec[0], 30000.0);
        assert_eq!(vec[2], 25000.0);
    }

    #[test]
    fn test_feature_name_matching() {
        assert!(matches_feature_names(&feature_names()));

        let reordered = vec![
            "lag_3".to_string(),
            "lag_2".to_string(),
            "lag_1".to_string(),
        ];
        assert!(!matches_feature_names(&reordered));
        assert!(!matches_feature_names(&feature_names()[..2]));
    }
}
