//! Process-wide set of loaded forecast models.
//!
//! Built once at startup, then only read. The server shares it behind an
//! `Arc` and never mutates it, so request handlers read it without locks.

use crate::application::ml::forecast_model::ForecastModel;
use crate::domain::errors::{ArtifactError, ForecastError, RegistryError};
use crate::domain::ml::ModelFamily;
use crate::infrastructure::ml::read_artifact;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// An artifact that was present but could not be loaded
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedArtifact {
    pub family: ModelFamily,
    pub reason: String,
}

pub struct ModelRegistry {
    models: HashMap<ModelFamily, ForecastModel>,
    artifact_dir: PathBuf,
    skipped: Vec<SkippedArtifact>,
}

impl ModelRegistry {
    /// Loads every family's artifact from `artifact_dir`.
    ///
    /// A missing or broken artifact only removes that family from the
    /// registry. Zero loaded models yields an empty registry; callers
    /// decide what that means via [`ModelRegistry::ensure_usable`].
    pub fn load_all(artifact_dir: impl AsRef<Path>) -> Self {
        let artifact_dir = artifact_dir.as_ref().to_path_buf();
        let mut models = HashMap::new();
        let mut skipped = Vec::new();

        for family in ModelFamily::ALL {
            match read_artifact(&artifact_dir, family) {
                Ok(artifact) => {
                    info!(
                        "Loaded '{}' model ({} training samples, trained {})",
                        family, artifact.training.train_samples, artifact.trained_at
                    );
                    models.insert(family, artifact.model);
                }
                Err(ArtifactError::Missing { path }) => {
                    info!("No '{}' artifact at {:?}", family, path);
                }
                Err(e) => {
                    warn!("Skipping '{}' artifact: {}", family, e);
                    skipped.push(SkippedArtifact {
                        family,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Model registry ready: {} model(s) from {:?}",
            models.len(),
            artifact_dir
        );

        Self {
            models,
            artifact_dir,
            skipped,
        }
    }

    /// Builds a registry from already-trained models. A later model of the
    /// same family replaces the earlier one.
    pub fn from_models(models: impl IntoIterator<Item = ForecastModel>) -> Self {
        Self {
            models: models
                .into_iter()
                .map(|model| (model.family(), model))
                .collect(),
            artifact_dir: PathBuf::new(),
            skipped: Vec::new(),
        }
    }

    /// Loaded model identifiers, sorted.
    pub fn available_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .models
            .keys()
            .map(|family| family.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Exact, case-sensitive lookup by model identifier.
    pub fn get(&self, name: &str) -> Result<&ForecastModel, ForecastError> {
        ModelFamily::from_name(name)
            .and_then(|family| self.models.get(&family))
            .ok_or_else(|| ForecastError::ModelNotFound {
                requested: name.to_string(),
                available: self.available_names(),
            })
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedArtifact] {
        &self.skipped
    }

    /// Fails with `RegistryLoadFailure` when no model loaded.
    pub fn ensure_usable(&self) -> Result<(), RegistryError> {
        if self.is_empty() {
            return Err(RegistryError::RegistryLoadFailure {
                dir: self.artifact_dir.clone(),
                skipped: self.skipped.len(),
            });
        }
        Ok(())
    }
}
