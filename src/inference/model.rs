//! Regression models that turn a feature row into a RUL estimate.
//!
//! Two model families are supported:
//! - [`TreeEnsemble`]: gradient-boosted regression trees, evaluated the way
//!   XGBoost does (`x < threshold` goes to the "yes" branch, NaN follows the
//!   node's missing-value branch, output is `base_score + Σ leaves`).
//! - [`LinearModel`]: `bias + w·x`, mostly useful as a baseline.
//!
//! Models are built from their serde specs through `TryFrom`, which validates
//! the structure once so evaluation never has to.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inference::features::{FeatureVector, FEATURE_COUNT};

/// Anything that can map a feature row to a single RUL value.
///
/// Implementations are immutable after construction and shared across
/// request handlers behind an `Arc`.
pub trait Regressor: Send + Sync {
    /// Predict remaining useful life (in cycles) for one row.
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("tree ensemble has no trees")]
    EmptyEnsemble,

    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },

    #[error("tree {tree} node {node}: feature index {feature} out of range (model has {} features)", FEATURE_COUNT)]
    FeatureOutOfRange { tree: usize, node: usize, feature: usize },

    #[error("tree {tree} node {node}: child {child} out of range")]
    ChildOutOfRange { tree: usize, node: usize, child: usize },

    #[error("tree {tree} node {node}: child {child} must come after its parent")]
    ChildBeforeParent { tree: usize, node: usize, child: usize },

    #[error("non-finite value in {0}")]
    NonFinite(String),

    #[error("expected {expected} weights, got {got}")]
    WeightCount { expected: usize, got: usize },
}

// ─── Serde specs ───────────────────────────────────────────────────────────

/// On-disk model description, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    TreeEnsemble(TreeEnsembleSpec),
    Linear(LinearSpec),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleSpec {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<TreeSpec>,
}

/// One tree as a flat node array; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        yes: usize,
        no: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        missing: Option<usize>,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSpec {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

// ─── Tree ensemble ─────────────────────────────────────────────────────────

/// A validated gradient-boosted tree ensemble.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    base_score: f64,
    trees: Vec<Vec<Node>>,
}

impl TreeEnsemble {
    fn leaf_value(nodes: &[Node], row: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match nodes[idx] {
                Node::Leaf { leaf } => return leaf,
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                } => {
                    let x = row[feature];
                    idx = if x.is_nan() {
                        missing.unwrap_or(yes)
                    } else if x < threshold {
                        yes
                    } else {
                        no
                    };
                }
            }
        }
    }
}

impl TryFrom<TreeEnsembleSpec> for TreeEnsemble {
    type Error = ValidationError;

    fn try_from(spec: TreeEnsembleSpec) -> Result<Self, Self::Error> {
        if spec.trees.is_empty() {
            return Err(ValidationError::EmptyEnsemble);
        }
        if !spec.base_score.is_finite() {
            return Err(ValidationError::NonFinite("base_score".to_string()));
        }

        for (tree, t) in spec.trees.iter().enumerate() {
            if t.nodes.is_empty() {
                return Err(ValidationError::EmptyTree { tree });
            }
            for (node, n) in t.nodes.iter().enumerate() {
                match *n {
                    Node::Leaf { leaf } => {
                        if !leaf.is_finite() {
                            return Err(ValidationError::NonFinite(format!(
                                "tree {tree} node {node} leaf"
                            )));
                        }
                    }
                    Node::Split {
                        feature,
                        threshold,
                        yes,
                        no,
                        missing,
                    } => {
                        if feature >= FEATURE_COUNT {
                            return Err(ValidationError::FeatureOutOfRange { tree, node, feature });
                        }
                        if threshold.is_nan() {
                            return Err(ValidationError::NonFinite(format!(
                                "tree {tree} node {node} threshold"
                            )));
                        }
                        // Children strictly after the parent keeps every walk acyclic.
                        for child in [Some(yes), Some(no), missing].into_iter().flatten() {
                            if child >= t.nodes.len() {
                                return Err(ValidationError::ChildOutOfRange { tree, node, child });
                            }
                            if child <= node {
                                return Err(ValidationError::ChildBeforeParent { tree, node, child });
                            }
                        }
                    }
                }
            }
        }

        Ok(Self {
            base_score: spec.base_score,
            trees: spec.trees.into_iter().map(|t| t.nodes).collect(),
        })
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let row = features.values();
        let rul = self.base_score
            + self
                .trees
                .iter()
                .map(|nodes| Self::leaf_value(nodes, row))
                .sum::<f64>();
        finite(rul)
    }

    fn describe(&self) -> String {
        format!("tree_ensemble({} trees)", self.trees.len())
    }
}

// ─── Linear model ──────────────────────────────────────────────────────────

/// A validated linear regressor.
#[derive(Debug, Clone)]
pub struct LinearModel {
    weights: [f64; FEATURE_COUNT],
    bias: f64,
}

impl TryFrom<LinearSpec> for LinearModel {
    type Error = ValidationError;

    fn try_from(spec: LinearSpec) -> Result<Self, Self::Error> {
        let weights: [f64; FEATURE_COUNT] =
            spec.weights
                .as_slice()
                .try_into()
                .map_err(|_| ValidationError::WeightCount {
                    expected: FEATURE_COUNT,
                    got: spec.weights.len(),
                })?;
        if let Some(i) = weights.iter().position(|w| !w.is_finite()) {
            return Err(ValidationError::NonFinite(format!("weight {i}")));
        }
        if !spec.bias.is_finite() {
            return Err(ValidationError::NonFinite("bias".to_string()));
        }
        Ok(Self {
            weights,
            bias: spec.bias,
        })
    }
}

impl Regressor for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let dot: f64 = self
            .weights
            .iter()
            .zip(features.values())
            .map(|(w, x)| w * x)
            .sum();
        finite(self.bias + dot)
    }

    fn describe(&self) -> String {
        "linear".to_string()
    }
}

// ─── Model ─────────────────────────────────────────────────────────────────

/// Any supported model family.
#[derive(Debug, Clone)]
pub enum Model {
    TreeEnsemble(TreeEnsemble),
    Linear(LinearModel),
}

impl TryFrom<ModelSpec> for Model {
    type Error = ValidationError;

    fn try_from(spec: ModelSpec) -> Result<Self, Self::Error> {
        Ok(match spec {
            ModelSpec::TreeEnsemble(s) => Model::TreeEnsemble(s.try_into()?),
            ModelSpec::Linear(s) => Model::Linear(s.try_into()?),
        })
    }
}

impl Regressor for Model {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        match self {
            Model::TreeEnsemble(m) => m.predict(features),
            Model::Linear(m) => m.predict(features),
        }
    }

    fn describe(&self) -> String {
        match self {
            Model::TreeEnsemble(m) => m.describe(),
            Model::Linear(m) => m.describe(),
        }
    }
}

fn finite(rul: f64) -> Result<f64, InferenceError> {
    if rul.is_finite() {
        Ok(rul)
    } else {
        Err(InferenceError::NonFinite(rul))
    }
}
