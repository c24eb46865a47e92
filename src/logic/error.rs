//! Error handling
//!
//! Load-class failures are fatal: no prediction is possible and no substitute
//! model is ever created. Everything else is per-request.

use std::path::PathBuf;

use thiserror::Error;

use crate::logic::features::layout::LayoutMismatchError;

pub type AdapterResult<T> = Result<T, AdapterError>;

#[derive(Debug, Error)]
pub enum AdapterError {
    // Model artifact errors (fatal)
    #[error("Model not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Model checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Invalid model metadata: {0}")]
    Metadata(String),

    // Input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Alignment errors
    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("Feature shape mismatch: model expects {expected} features, got {actual}")]
    FeatureShape { expected: usize, actual: usize },

    // Output integrity errors
    #[error("Class count mismatch: expected {expected} classes, model returned {actual}")]
    ClassCountMismatch { expected: usize, actual: usize },

    #[error("Model returned label {0} outside the rock-burst grade range")]
    LabelOutOfRange(i64),

    #[error("Invalid probability output: {0}")]
    InvalidProbabilities(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl AdapterError {
    /// True when no valid prediction is possible until the model is fixed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AdapterError::ModelNotFound(_)
                | AdapterError::ModelLoad(_)
                | AdapterError::ModelNotLoaded
                | AdapterError::ChecksumMismatch { .. }
                | AdapterError::Metadata(_)
        )
    }

    /// True when the model answered but its output violates the grade contract.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            AdapterError::ClassCountMismatch { .. }
                | AdapterError::LabelOutOfRange(_)
                | AdapterError::InvalidProbabilities(_)
        )
    }
}
