use crate::domain::errors::ForecastError;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failures surfaced by the HTTP layer
#[derive(Debug)]
pub enum ApiError {
    Forecast(ForecastError),
    /// Prediction logging is disabled, so there is nothing to read back
    LogSinkUnavailable,
    Internal(String),
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        ApiError::Forecast(e)
    }
}

/// A query string that does not decode (e.g. a repeated key) is bad input.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Forecast(ForecastError::invalid_input("query", rejection.body_text()))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.message();
        let (status, body) = match &self {
            ApiError::Forecast(ForecastError::InvalidInput { field, .. }) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "InvalidInput", "field": field, "message": message }),
            ),
            ApiError::Forecast(ForecastError::ModelNotFound {
                requested,
                available,
            }) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "ModelNotFound",
                    "requested": requested,
                    "available_models": available,
                    "message": message,
                }),
            ),
            ApiError::Forecast(ForecastError::ModelFailure { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "ModelFailure", "message": message }),
            ),
            ApiError::LogSinkUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "LogSinkUnavailable", "message": message }),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal", "message": message }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            ApiError::Forecast(e) => e.to_string(),
            ApiError::LogSinkUnavailable => "Prediction logging is disabled".to_string(),
            ApiError::Internal(reason) => reason.clone(),
        }
    }
}
