mod common;

use common::fit;
use sales_forecast::application::ml::ModelRegistry;
use sales_forecast::application::ml::artifact::{ModelArtifact, TrainingSummary};
use sales_forecast::domain::ml::{FeatureVector, ModelFamily};
use sales_forecast::infrastructure::ml::{artifact_path, write_artifact};
use std::fs;
use tempfile::TempDir;

fn summary() -> TrainingSummary {
    TrainingSummary {
        train_samples: 343,
        test_samples: 0,
        horizon: 0,
        holdout: None,
    }
}

fn save(dir: &TempDir, family: ModelFamily) -> ModelArtifact {
    let artifact = ModelArtifact::new(fit(family), summary());
    write_artifact(dir.path(), &artifact).unwrap();
    artifact
}

#[test]
fn test_loads_every_saved_family() {
    let dir = TempDir::new().unwrap();
    let saved = [
        save(&dir, ModelFamily::RandomForest),
        save(&dir, ModelFamily::GradientBoosting),
    ];

    let registry = ModelRegistry::load_all(dir.path());
    assert_eq!(registry.available_names(), vec!["rf", "xgb"]);
    assert!(registry.skipped().is_empty());
    assert!(registry.ensure_usable().is_ok());

    // A reloaded model reproduces the saved one bit for bit.
    let inputs = [
        (30000.0, 28000.0, 25000.0),
        (12345.678, 23456.789, 34567.891),
        (0.1, 0.2, 0.3),
    ];
    for artifact in &saved {
        let loaded = registry.get(artifact.family().name()).unwrap();
        for (l1, l2, l3) in inputs {
            let fv = FeatureVector::new(l1, l2, l3).unwrap();
            assert_eq!(
                loaded.predict(&fv).unwrap().to_bits(),
                artifact.model.predict(&fv).unwrap().to_bits(),
                "{} at {:?}",
                artifact.family(),
                (l1, l2, l3)
            );
        }
    }
}

#[test]
fn test_missing_family_is_simply_absent() {
    let dir = TempDir::new().unwrap();
    save(&dir, ModelFamily::GradientBoosting);

    let registry = ModelRegistry::load_all(dir.path());
    assert_eq!(registry.available_names(), vec!["xgb"]);
    assert!(registry.skipped().is_empty());
    assert!(registry.get("rf").is_err());
}

#[test]
fn test_corrupt_artifact_is_skipped() {
    let dir = TempDir::new().unwrap();
    save(&dir, ModelFamily::RandomForest);
    fs::write(
        artifact_path(dir.path(), ModelFamily::GradientBoosting),
        b"{\"format_version\": 1, \"model\": ",
    )
    .unwrap();

    let registry = ModelRegistry::load_all(dir.path());
    assert_eq!(registry.available_names(), vec!["rf"]);
    assert_eq!(registry.skipped().len(), 1);
    assert_eq!(registry.skipped()[0].family, ModelFamily::GradientBoosting);
}

#[test]
fn test_artifact_under_wrong_name_is_skipped() {
    let dir = TempDir::new().unwrap();
    let artifact = ModelArtifact::new(fit(ModelFamily::RandomForest), summary());
    fs::write(
        artifact_path(dir.path(), ModelFamily::GradientBoosting),
        serde_json::to_vec(&artifact).unwrap(),
    )
    .unwrap();

    let registry = ModelRegistry::load_all(dir.path());
    assert!(registry.is_empty());
    assert_eq!(registry.skipped().len(), 1);
    assert!(registry.skipped()[0].reason.contains("named for 'xgb'"));
}

#[test]
fn test_incompatible_envelopes_are_skipped() {
    let dir = TempDir::new().unwrap();

    let mut reordered = ModelArtifact::new(fit(ModelFamily::RandomForest), summary());
    reordered.feature_names.reverse();
    write_artifact(dir.path(), &reordered).unwrap();

    let mut future = ModelArtifact::new(fit(ModelFamily::GradientBoosting), summary());
    future.format_version = 99;
    write_artifact(dir.path(), &future).unwrap();

    let registry = ModelRegistry::load_all(dir.path());
    assert!(registry.is_empty());
    assert_eq!(registry.skipped().len(), 2);
    assert!(registry.ensure_usable().is_err());
}

#[test]
fn test_empty_directory_yields_degraded_registry() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::load_all(dir.path());

    assert!(registry.is_empty());
    let err = registry.ensure_usable().unwrap_err();
    assert!(err.to_string().contains("No model artifacts"));
}
