//! API error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::inference::features::FeatureError;
use crate::inference::model::InferenceError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("{0}")]
    InvalidBody(String),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody(_) | ApiError::Feature(_) | ApiError::Inference(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::ModelUnavailable => "model_unavailable",
            ApiError::InvalidBody(_) => "invalid_body",
            ApiError::Feature(_) => "invalid_input",
            ApiError::Inference(_) => "inference",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!(status = status.as_u16(), kind = self.kind(), error = %self, "Request failed");
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
