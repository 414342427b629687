use crate::domain::errors::ForecastError;
use crate::domain::ml::feature_registry::LAG_FIELDS;
use serde::Serialize;

/// Aggregate sales of the three most recent periods, most recent first.
///
/// Every value is finite. No ordering between magnitudes is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    lag1: f64,
    lag2: f64,
    lag3: f64,
}

impl FeatureVector {
    pub fn new(lag1: f64, lag2: f64, lag3: f64) -> Result<Self, ForecastError> {
        let lags = [lag1, lag2, lag3];
        for (field, value) in LAG_FIELDS.iter().zip(lags) {
            ensure_finite(field, value)?;
        }
        Ok(Self { lag1, lag2, lag3 })
    }

    /// Builds a vector from raw request values, checking `lag1`, `lag2`, `lag3` in that order.
    pub fn parse(
        lag1: Option<&str>,
        lag2: Option<&str>,
        lag3: Option<&str>,
    ) -> Result<Self, ForecastError> {
        let lag1 = parse_lag(LAG_FIELDS[0], lag1)?;
        let lag2 = parse_lag(LAG_FIELDS[1], lag2)?;
        let lag3 = parse_lag(LAG_FIELDS[2], lag3)?;
        Ok(Self { lag1, lag2, lag3 })
    }

    pub fn lag1(&self) -> f64 {
        self.lag1
    }

    pub fn lag2(&self) -> f64 {
        self.lag2
    }

    pub fn lag3(&self) -> f64 {
        self.lag3
    }

    pub fn lags(&self) -> [f64; 3] {
        [self.lag1, self.lag2, self.lag3]
    }
}

/// Parses a single lag value. Missing, non-numeric and non-finite input is rejected.
pub fn parse_lag(field: &str, raw: Option<&str>) -> Result<f64, ForecastError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ForecastError::invalid_input(field, "value is required"))?;

    let value = raw
        .parse::<f64>()
        .map_err(|_| ForecastError::invalid_input(field, format!("'{}' is not a number", raw)))?;

    ensure_finite(field, value)?;
    Ok(value)
}

fn ensure_finite(field: &str, value: f64) -> Result<(), ForecastError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ForecastError::invalid_input(
            field,
            format!("{} is not a finite number", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(result: Result<FeatureVector, ForecastError>) -> String {
        match result {
            Err(ForecastError::InvalidInput { field, .. }) => field,
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_valid_lags() {
        let fv = FeatureVector::parse(Some("30000"), Some(" 28000.5 "), Some("-1e3")).unwrap();
        assert_eq!(fv.lags(), [30000.0, 28000.5, -1000.0]);
    }

    #[test]
    fn test_non_numeric_lag_is_named() {
        let result = FeatureVector::parse(Some("abc"), Some("28000"), Some("25000"));
        assert_eq!(invalid_field(result), "lag1");
    }

    #[test]
    fn test_missing_lag_is_named() {
        let result = FeatureVector::parse(Some("1"), None, Some("3"));
        assert_eq!(invalid_field(result), "lag2");

        let result = FeatureVector::parse(Some("1"), Some("2"), Some("   "));
        assert_eq!(invalid_field(result), "lag3");
    }

    #[test]
    fn test_non_finite_lags_rejected() {
        for raw in ["NaN", "inf", "-infinity", "1e400"] {
            let result = FeatureVector::parse(Some("1"), Some(raw), Some("3"));
            assert_eq!(invalid_field(result), "lag2", "input {raw}");
        }
        assert_eq!(
            invalid_field(FeatureVector::new(1.0, 2.0, f64::NAN)),
            "lag3"
        );
    }

    #[test]
    fn test_first_invalid_field_wins() {
        let result = FeatureVector::parse(None, Some("x"), Some("y"));
        assert_eq!(invalid_field(result), "lag1");
    }

    #[test]
    fn test_no_ordering_constraint() {
        assert!(FeatureVector::new(10.0, 50.0, 5.0).is_ok());
        assert!(FeatureVector::new(0.0, 0.0, 0.0).is_ok());
    }
}
