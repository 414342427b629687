use crate::application::forecast::PredictionRequest;
use crate::domain::errors::ForecastError;
use crate::domain::forecast::PredictionRecord;
use crate::interfaces::http::AppState;
use crate::interfaces::http::error::ApiError;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const DEFAULT_LOG_LIMIT: usize = 10;
pub const MAX_LOG_LIMIT: usize = 500;

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub available_models: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub models_loaded: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<String>,
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Sales forecast API",
        "available_models": state.registry().available_names(),
    }))
}

/// Degraded (503) while no model is loaded; the process still serves requests.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let models_loaded = state.registry().len();
    let (status, label) = if models_loaded > 0 {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        status,
        Json(HealthResponse {
            status: label,
            version: env!("CARGO_PKG_VERSION"),
            models_loaded,
        }),
    )
}

pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        available_models: state.registry().available_names(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    query: Result<Query<PredictionRequest>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(request) = query?;
    let forecast = state.service.predict(&request)?;
    Ok(Json(forecast))
}

pub async fn latest_logs(
    State(state): State<AppState>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> Result<Json<Vec<PredictionRecord>>, ApiError> {
    let Query(query) = query?;
    let limit = parse_limit(query.limit.as_deref())?;
    let store = state.log_store.as_ref().ok_or(ApiError::LogSinkUnavailable)?;
    let records = store.find_recent(limit).await?;
    Ok(Json(records))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Defaults to 10, clamped to `1..=500`.
pub fn parse_limit(raw: Option<&str>) -> Result<usize, ForecastError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_LOG_LIMIT);
    };
    let limit = raw.parse::<i64>().map_err(|_| {
        ForecastError::invalid_input("limit", format!("'{}' is not an integer", raw))
    })?;
    Ok(limit.clamp(1, MAX_LOG_LIMIT as i64) as usize)
}
