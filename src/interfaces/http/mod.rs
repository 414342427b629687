//! HTTP surface of the forecast service.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::application::forecast::PredictionService;
use crate::application::ml::ModelRegistry;
use crate::domain::repositories::PredictionLogRepository;
use crate::infrastructure::observability::Metrics;
use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: PredictionService,
    /// Read side of the prediction log; `None` when logging is disabled
    pub log_store: Option<Arc<dyn PredictionLogRepository>>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn registry(&self) -> &ModelRegistry {
        self.service.registry()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub cors_origins: Vec<String>,
    pub expose_metrics: bool,
}

pub fn router(state: AppState, options: &RouterOptions) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/models", get(handlers::list_models))
        .route("/predict", get(handlers::predict))
        .route("/logs/latest", get(handlers::latest_logs));

    if options.expose_metrics {
        app = app.route("/metrics", get(handlers::metrics));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors_layer(&options.cors_origins))
        .with_state(state)
}

/// Read-only API, so only GET is allowed. An empty origin list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}
