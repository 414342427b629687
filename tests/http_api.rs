mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{empty_registry, fit, full_registry};
use http_body_util::BodyExt;
use sales_forecast::application::forecast::{PredictionLogger, PredictionService};
use sales_forecast::application::ml::ModelRegistry;
use sales_forecast::domain::ml::ModelFamily;
use sales_forecast::domain::repositories::PredictionLogRepository;
use sales_forecast::infrastructure::InMemoryPredictionLogRepository;
use sales_forecast::infrastructure::observability::Metrics;
use sales_forecast::interfaces::http::{AppState, RouterOptions, router};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(
    registry: Arc<ModelRegistry>,
    log_store: Option<Arc<InMemoryPredictionLogRepository>>,
) -> Router {
    let metrics = Metrics::new().unwrap();
    let mut service = PredictionService::new(registry, metrics.clone());
    let mut store: Option<Arc<dyn PredictionLogRepository>> = None;
    if let Some(repo) = log_store {
        let (logger, _handle) = PredictionLogger::spawn(repo.clone(), 64, metrics.clone());
        service = service.with_logger(logger);
        store = Some(repo as Arc<dyn PredictionLogRepository>);
    }

    router(
        AppState {
            service,
            log_store: store,
            metrics,
        },
        &RouterOptions {
            cors_origins: Vec::new(),
            expose_metrics: true,
        },
    )
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_predict_with_known_model() {
    let app = app(full_registry(), None);
    let (status, body) = get(&app, "/predict?lag1=30000&lag2=28000&lag3=25000&model=rf").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "rf");
    assert!(body["prediction"].as_f64().unwrap().is_finite());
    assert_eq!(body["logged"], false);
}

#[tokio::test]
async fn test_predict_with_unknown_model() {
    let app = app(full_registry(), None);
    let (status, body) = get(&app, "/predict?lag1=30000&lag2=28000&lag3=25000&model=lstm").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ModelNotFound");
    assert_eq!(body["requested"], "lstm");
    assert_eq!(body["available_models"], serde_json::json!(["rf", "xgb"]));
}

#[tokio::test]
async fn test_predict_with_family_that_did_not_load() {
    let registry = Arc::new(ModelRegistry::from_models([fit(ModelFamily::RandomForest)]));
    let app = app(registry, None);
    let (status, body) = get(&app, "/predict?lag1=30000&lag2=28000&lag3=25000&model=xgb").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["available_models"], serde_json::json!(["rf"]));
}

#[tokio::test]
async fn test_predict_with_invalid_lag() {
    let app = app(full_registry(), None);
    let (status, body) = get(&app, "/predict?lag1=abc&lag2=28000&lag3=25000&model=rf").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidInput");
    assert_eq!(body["field"], "lag1");

    let (status, body) = get(&app, "/predict?lag1=1&lag2=2&lag3=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "model");
}

#[tokio::test]
async fn test_undecodable_query_is_invalid_input() {
    let app = app(full_registry(), Some(Arc::new(InMemoryPredictionLogRepository::new())));

    for uri in [
        "/predict?lag1=1&lag1=2&lag2=2&lag3=3&model=rf",
        "/logs/latest?limit=1&limit=2",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "InvalidInput", "{}", uri);
        assert_eq!(body["field"], "query", "{}", uri);
    }
}

#[tokio::test]
async fn test_models_and_health() {
    let app = app(full_registry(), None);

    let (status, body) = get(&app, "/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_models"], serde_json::json!(["rf", "xgb"]));

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["models_loaded"], 2);

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_models"], serde_json::json!(["rf", "xgb"]));
}

#[tokio::test]
async fn test_empty_registry_is_degraded() {
    let app = app(empty_registry(), None);

    let (status, body) = get(&app, "/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_models"], serde_json::json!([]));

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");

    for model in ["rf", "xgb"] {
        let uri = format!("/predict?lag1=1&lag2=2&lag3=3&model={}", model);
        let (status, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["available_models"], serde_json::json!([]));
    }
}

#[tokio::test]
async fn test_latest_logs() {
    let repo = Arc::new(InMemoryPredictionLogRepository::new());
    let app = app(full_registry(), Some(repo.clone()));

    for lag1 in ["10000", "20000", "30000"] {
        let uri = format!("/predict?lag1={}&lag2=28000&lag3=25000&model=xgb", lag1);
        let (status, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["logged"], true);
    }

    // The writer runs in the background.
    for _ in 0..100 {
        if repo.count().await.unwrap() == 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let (status, body) = get(&app, "/logs/latest?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["lag1"], 30000.0);
    assert_eq!(rows[0]["model"], "xgb");
    assert_eq!(rows[1]["lag1"], 20000.0);

    let (status, body) = get(&app, "/logs/latest?limit=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "limit");
}

#[tokio::test]
async fn test_latest_logs_without_sink() {
    let app = app(full_registry(), None);
    let (status, body) = get(&app, "/logs/latest").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "LogSinkUnavailable");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = app(full_registry(), None);
    get(&app, "/predict?lag1=1&lag2=2&lag3=3&model=rf").await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("forecast_predictions_total{model=\"rf\",outcome=\"ok\"} 1"));
}
