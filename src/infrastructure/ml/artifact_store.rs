//! Reads and writes model artifacts as JSON files.
//!
//! Layout: one `sales_forecast_<family>.json` per family inside the model directory.

use crate::application::ml::artifact::ModelArtifact;
use crate::domain::errors::ArtifactError;
use crate::domain::ml::ModelFamily;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn artifact_path(dir: &Path, family: ModelFamily) -> PathBuf {
    dir.join(family.artifact_file_name())
}

/// Loads and validates the artifact for `family` from `dir`.
pub fn read_artifact(dir: &Path, family: ModelFamily) -> Result<ModelArtifact, ArtifactError> {
    let path = artifact_path(dir, family);

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(ArtifactError::Missing { path }),
        Err(source) => return Err(ArtifactError::Io { path, source }),
    };

    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| ArtifactError::Malformed {
            path: path.clone(),
            source,
        })?;

    artifact
        .check_compatible(family)
        .map_err(|reason| ArtifactError::Incompatible { path, reason })?;

    Ok(artifact)
}

/// Writes `artifact` under its family name, replacing any previous file.
pub fn write_artifact(dir: &Path, artifact: &ModelArtifact) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory {:?}", dir))?;

    let path = artifact_path(dir, artifact.family());
    // Write beside the target first so a reader never sees a partial file.
    let tmp_path = path.with_extension("json.tmp");
    {
        let file = File::create(&tmp_path)
            .with_context(|| format!("Failed to create {:?}", tmp_path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, artifact).context("Failed to serialize artifact")?;
        writer.flush().context("Failed to flush artifact")?;
    }
    fs::rename(&tmp_path, &path)
        .with_context(|| format!("Failed to move artifact into place at {:?}", path))?;

    info!("Saved {} artifact to {:?}", artifact.family(), path);
    Ok(path)
}
