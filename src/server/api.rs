//! RUL prediction HTTP API.
//!
//! - GET /          liveness check and model version
//! - POST /predict  sensor readings → RUL, status band and message
//! - GET /health    model availability and uptime
//! - GET /metrics   Prometheus exposition

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::inference::features::{FeatureVector, FEATURE_COUNT};
use crate::inference::model::Regressor;
use crate::inference::status::Assessment;
use crate::server::error::ApiError;
use crate::server::metrics::Metrics;

/// Application state shared across handlers.
///
/// `model` is `None` when the artifact failed to load at startup; the
/// service still runs so liveness and health checks can report it.
pub struct AppState {
    pub model: Option<Arc<dyn Regressor>>,
    pub config: Arc<Config>,
    pub metrics: Metrics,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Arc<Config>, model: Option<Arc<dyn Regressor>>) -> prometheus::Result<Self> {
        Ok(Self {
            model,
            config,
            metrics: Metrics::new()?,
            start_time: Instant::now(),
        })
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors_permissive = state.config.server.cors_permissive;

    let router = Router::new()
        .route("/", get(root))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

// ─── Request/Response Types ────────────────────────────────────────────────

/// Prediction request: raw readings keyed by sensor id.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub sensor_data: HashMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_rul: f64,
    pub status: String,
    pub color_code: String,
    pub message: String,
}

impl From<Assessment> for PredictResponse {
    fn from(a: Assessment) -> Self {
        Self {
            predicted_rul: a.predicted_rul,
            status: a.status.label().to_string(),
            color_code: a.status.color_code().to_string(),
            message: a.message(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub status: String,
    pub model_version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_version: String,
    pub feature_count: usize,
    pub uptime_secs: u64,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        status: "API is running".to_string(),
        model_version: state.config.model.version_label.clone(),
    })
}

async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();

    match assess(&state, payload) {
        Ok(assessment) => {
            state
                .metrics
                .record_prediction(assessment.status, assessment.predicted_rul);
            info!(
                request_id,
                rul = assessment.predicted_rul,
                status = %assessment.status,
                "Prediction served"
            );
            Ok(Json(assessment.into()))
        }
        Err(e) => {
            state.metrics.record_error(e.kind());
            debug!(request_id, kind = e.kind(), "Prediction rejected");
            Err(e)
        }
    }
}

/// Model check, feature shaping, inference and banding for one request.
fn assess(
    state: &AppState,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Assessment, ApiError> {
    let model = state.model.as_deref().ok_or(ApiError::ModelUnavailable)?;
    let Json(req) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;

    let features = FeatureVector::from_sensor_map(&req.sensor_data)?;
    let rul = model.predict(&features)?;

    Ok(Assessment::new(rul, &state.config.thresholds))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let model_loaded = state.model.is_some();
    Json(HealthResponse {
        status: if model_loaded { "ok" } else { "degraded" }.to_string(),
        model_loaded,
        model_version: state.config.model.version_label.clone(),
        feature_count: FEATURE_COUNT,
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to render metrics: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
