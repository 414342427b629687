//! HTTP server configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl ServerEnvConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse PORT")?;
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_default());

        Ok(Self {
            host,
            port,
            cors_origins,
        })
    }
}

/// Splits a comma-separated origin list, ignoring blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
