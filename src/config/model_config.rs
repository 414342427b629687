//! Model artifact location.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_DIR: &str = "reports/models";

#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub model_dir: PathBuf,
}

impl ModelEnvConfig {
    pub fn from_env() -> Self {
        Self {
            model_dir: env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR)),
        }
    }
}
