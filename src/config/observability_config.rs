//! Observability configuration parsing from environment variables.

use std::env;

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    /// Serve Prometheus metrics on `/metrics`
    pub enabled: bool,
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("OBSERVABILITY_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
        }
    }
}
