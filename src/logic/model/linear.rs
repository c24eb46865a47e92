//! Linear Classifier - Multinomial logistic regression stored as JSON
//!
//! `softmax(W · scale(x) + b)`, label = argmax. Deterministic, no runtime
//! dependency beyond serde.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classifier::{Classifier, ModelKind};
use crate::logic::error::{AdapterError, AdapterResult};

/// Standardisation applied before the linear layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Serialized artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// One row of weights per class
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

#[derive(Debug, Clone)]
pub struct LinearClassifier {
    model: LinearModel,
    width: usize,
}

impl LinearClassifier {
    pub fn new(model: LinearModel) -> AdapterResult<Self> {
        let width = model
            .coefficients
            .first()
            .map(Vec::len)
            .ok_or_else(|| AdapterError::ModelLoad("Linear model has no classes".to_string()))?;

        if width == 0 {
            return Err(AdapterError::ModelLoad("Linear model has no features".to_string()));
        }
        if model.coefficients.iter().any(|row| row.len() != width) {
            return Err(AdapterError::ModelLoad("Coefficient rows differ in width".to_string()));
        }
        if model.intercepts.len() != model.coefficients.len() {
            return Err(AdapterError::ModelLoad(format!(
                "{} intercepts for {} classes",
                model.intercepts.len(),
                model.coefficients.len()
            )));
        }
        if let Some(names) = &model.feature_names {
            if names.len() != width {
                return Err(AdapterError::ModelLoad(format!(
                    "{} feature names for {} coefficients",
                    names.len(),
                    width
                )));
            }
        }
        if let Some(scaler) = &model.scaler {
            if scaler.mean.len() != width || scaler.scale.len() != width {
                return Err(AdapterError::ModelLoad("Scaler width differs from coefficients".to_string()));
            }
        }

        Ok(Self { model, width })
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> AdapterResult<Self> {
        log::info!("Loading linear model from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .map_err(|e| AdapterError::ModelLoad(format!("Failed to read {}: {}", path.display(), e)))?;
        let model: LinearModel = serde_json::from_str(&content)
            .map_err(|e| AdapterError::ModelLoad(format!("Failed to parse {}: {}", path.display(), e)))?;

        Self::new(model)
    }

    /// Replace embedded feature names (sidecar metadata takes precedence)
    pub fn with_feature_names(mut self, names: Vec<String>) -> AdapterResult<Self> {
        if names.len() != self.width {
            return Err(AdapterError::Metadata(format!(
                "{} feature names in metadata, model has {} inputs",
                names.len(),
                self.width
            )));
        }
        self.model.feature_names = Some(names);
        Ok(self)
    }

    pub fn class_count(&self) -> usize {
        self.model.coefficients.len()
    }

    fn logits(&self, row: &[f64]) -> AdapterResult<Vec<f64>> {
        if row.len() != self.width {
            return Err(AdapterError::FeatureShape {
                expected: self.width,
                actual: row.len(),
            });
        }

        let scaled: Vec<f64> = match &self.model.scaler {
            Some(scaler) => row
                .iter()
                .zip(scaler.mean.iter().zip(&scaler.scale))
                .map(|(&x, (&mean, &scale))| if scale == 0.0 { x - mean } else { (x - mean) / scale })
                .collect(),
            None => row.to_vec(),
        };

        Ok(self
            .model
            .coefficients
            .iter()
            .zip(&self.model.intercepts)
            .map(|(weights, &bias)| bias + weights.iter().zip(&scaled).map(|(w, x)| w * x).sum::<f64>())
            .collect())
    }
}

/// Numerically stable softmax
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value (first wins on ties)
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

impl Classifier for LinearClassifier {
    fn kind(&self) -> ModelKind {
        ModelKind::Linear
    }

    fn predict(&self, row: &[f64]) -> AdapterResult<i64> {
        let probabilities = self.predict_proba(row)?;
        argmax(&probabilities)
            .map(|i| i as i64)
            .ok_or_else(|| AdapterError::Inference("Empty probability vector".to_string()))
    }

    fn predict_proba(&self, row: &[f64]) -> AdapterResult<Vec<f64>> {
        let probabilities = softmax(&self.logits(row)?);
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(AdapterError::Inference("Non-finite logits".to_string()));
        }
        Ok(probabilities)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.model.feature_names.as_deref()
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.width)
    }
}

// ============================================================================
// TESTS
// ============================================================================
