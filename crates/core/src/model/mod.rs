//! Pre-fit model pipeline.
//!
//! The scalers and the classifier are fitted by an external training job and shipped
//! as a JSON bundle. This module only loads and evaluates them; serving code talks to
//! them through [`Transformer`] and [`Predictor`] and never sees the bundle layout.

pub mod bundle;
pub mod scaler;
pub mod tree;

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::crop::CropLabel;
use crate::domain::features::FeatureVector;

pub use bundle::ModelBundle;
pub use scaler::{MinMaxScaler, StandardScaler};
pub use tree::{Classifier, DecisionTree, RandomForest, TreeNode};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("could not read model bundle `{path}`: {source}")]
    ReadBundle { path: PathBuf, source: std::io::Error },
    #[error("could not parse model bundle: {0}")]
    ParseBundle(#[source] serde_json::Error),
    #[error("invalid model bundle: {0}")]
    InvalidBundle(String),
    #[error("{stage} produced a non-finite value")]
    NonFinite { stage: &'static str },
}

/// Fitted per-feature transform.
pub trait Transformer: Send + Sync {
    fn name(&self) -> &'static str;

    fn transform(&self, input: &FeatureVector) -> Result<FeatureVector, ModelError>;
}

/// Fitted classifier mapping a normalized vector to a class label.
pub trait Predictor: Send + Sync {
    fn kind(&self) -> &'static str;

    fn predict(&self, input: &FeatureVector) -> Result<CropLabel, ModelError>;
}

pub(crate) fn ensure_finite(
    vector: FeatureVector,
    stage: &'static str,
) -> Result<FeatureVector, ModelError> {
    if vector.is_finite() {
        Ok(vector)
    } else {
        Err(ModelError::NonFinite { stage })
    }
}
