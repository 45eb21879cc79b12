//! Model artifact loading.
//!
//! Reads the JSON model artifact exported by the training pipeline, checks
//! that it was trained on the expected feature order and validates its
//! structure. Loading happens once at startup; the result is immutable.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::inference::features::{FEATURE_COUNT, FEATURE_ORDER};
use crate::inference::model::{Model, ModelSpec, Regressor, ValidationError};

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("Model file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid model format: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("Model was trained on features {got:?}, expected {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("Invalid model: {0}")]
    Invalid(#[from] ValidationError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The on-disk artifact: the model plus the column order it was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Training column order. Optional, but checked when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,

    pub model: ModelSpec,
}

impl ModelArtifact {
    /// Turn the artifact into a validated model.
    pub fn into_model(self) -> Result<Model, ModelLoadError> {
        if let Some(names) = &self.feature_names {
            if names.len() != FEATURE_COUNT || names.iter().zip(FEATURE_ORDER).any(|(a, b)| a != b) {
                return Err(ModelLoadError::FeatureMismatch {
                    expected: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
                    got: names.clone(),
                });
            }
        }
        Ok(Model::try_from(self.model)?)
    }
}

/// Parse and validate a model from a JSON string.
pub fn model_from_json(json: &str) -> Result<Model, ModelLoadError> {
    let artifact: ModelArtifact = serde_json::from_str(json)?;
    artifact.into_model()
}

/// Load a model artifact from disk.
pub fn load_model(path: &Path) -> Result<Model, ModelLoadError> {
    if !path.exists() {
        return Err(ModelLoadError::FileNotFound(path.display().to_string()));
    }

    let data = std::fs::read_to_string(path)?;
    let model = model_from_json(&data)?;

    info!(
        path = %path.display(),
        model = model.describe(),
        features = FEATURE_COUNT,
        "Loaded model artifact"
    );

    Ok(model)
}
