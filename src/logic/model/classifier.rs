//! Classifier Trait - Seam between the adapter and model backends
//!
//! Backends must answer "label for one row" and "probabilities for one row".
//! Expected feature names and the training-time layout are optional
//! capabilities; the adapter falls back when they are absent.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::logic::error::AdapterResult;

/// Model backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// ONNX graph run through ONNX Runtime
    Onnx,
    /// Multinomial logistic regression stored as JSON
    Linear,
}

impl ModelKind {
    /// Infer backend from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
            Some("onnx") => Some(ModelKind::Onnx),
            Some("json") => Some(ModelKind::Linear),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Onnx => "onnx",
            ModelKind::Linear => "linear",
        }
    }
}

/// Trait for classifier backends (ONNX, linear, test doubles)
pub trait Classifier: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Predicted class label for one row
    fn predict(&self, row: &[f64]) -> AdapterResult<i64>;

    /// Per-class probabilities for one row
    fn predict_proba(&self, row: &[f64]) -> AdapterResult<Vec<f64>>;

    /// Label and probabilities together (backends that compute both in one pass override this)
    fn classify(&self, row: &[f64]) -> AdapterResult<(i64, Vec<f64>)> {
        Ok((self.predict(row)?, self.predict_proba(row)?))
    }

    /// Ordered feature names the model was trained on, if known
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Input width, if known
    fn n_features(&self) -> Option<usize> {
        self.feature_names().map(|names| names.len())
    }

    /// (feature version, layout hash) recorded at training time, if known
    fn declared_layout(&self) -> Option<(Option<u8>, Option<u32>)> {
        None
    }
}
