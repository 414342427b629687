use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of forecast model families.
///
/// Adding a family is a code change: it needs a `ForecastModel` variant and a trainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelFamily {
    /// Ensemble of bagged regression trees
    #[serde(rename = "rf")]
    RandomForest,
    /// Boosted regression trees on squared error
    #[serde(rename = "xgb")]
    GradientBoosting,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 2] = [ModelFamily::RandomForest, ModelFamily::GradientBoosting];

    /// Identifier used in requests, artifact names and logs.
    pub fn name(&self) -> &'static str {
        match self {
            ModelFamily::RandomForest => "rf",
            ModelFamily::GradientBoosting => "xgb",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelFamily::RandomForest => "RandomForest",
            ModelFamily::GradientBoosting => "GradientBoosting",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|family| family.name() == name)
    }

    pub fn artifact_file_name(&self) -> String {
        format!("sales_forecast_{}.json", self.name())
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelFamily {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| anyhow::anyhow!("Invalid model family: {}. Must be 'rf' or 'xgb'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for family in ModelFamily::ALL {
            assert_eq!(ModelFamily::from_name(family.name()), Some(family));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(ModelFamily::from_name("RF"), None);
        assert_eq!(ModelFamily::from_name(" rf"), None);
        assert!("Xgb".parse::<ModelFamily>().is_err());
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(
            ModelFamily::GradientBoosting.artifact_file_name(),
            "sales_forecast_xgb.json"
        );
    }

    #[test]
    fn test_serde_uses_short_names() {
        let json = serde_json::to_string(&ModelFamily::RandomForest).unwrap();
        assert_eq!(json, "\"rf\"");
    }
}
