//! Model Store - Process-wide, load-once model handle
//!
//! The handle is initialised at most once and read-only afterwards. A failed
//! load leaves the store empty; no substitute model is ever installed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::classifier::{Classifier, ModelKind};
use super::linear::LinearClassifier;
use super::metadata::{verify_checksum, LayoutCheck, ModelMetadata};
use super::onnx::OnnxClassifier;
use crate::constants::GRADE_COUNT;
use crate::logic::config::AdapterConfig;
use crate::logic::error::{AdapterError, AdapterResult};

// ============================================================================
// STATE
// ============================================================================

static MODEL: OnceCell<LoadedModel> = OnceCell::new();

/// Latency stats
static LATENCY_SUM: AtomicU64 = AtomicU64::new(0);
static INFERENCE_COUNT: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// LOADED MODEL
// ============================================================================

/// Classifier plus the metadata it was trained with
pub struct LoadedModel {
    classifier: Box<dyn Classifier>,
    metadata: ModelMetadata,
    path: PathBuf,
    loaded_at: chrono::DateTime<chrono::Utc>,
}

impl LoadedModel {
    /// Load artifact + metadata according to config
    pub fn load(config: &AdapterConfig) -> AdapterResult<Self> {
        let path = config.model_path.as_path();

        if !path.exists() {
            return Err(AdapterError::ModelNotFound(path.to_path_buf()));
        }

        let metadata = ModelMetadata::resolve(path, config.metadata_path.as_deref())?;

        if config.verify_checksum {
            match &metadata.sha256 {
                Some(expected) => verify_checksum(path, expected)?,
                None => log::debug!("No checksum recorded for {}, skipping verification", path.display()),
            }
        }

        let kind = metadata
            .model_type
            .or_else(|| ModelKind::from_path(path))
            .ok_or_else(|| {
                AdapterError::ModelLoad(format!(
                    "Cannot infer model type from {} (expected .onnx or .json)",
                    path.display()
                ))
            })?;

        let classifier: Box<dyn Classifier> = match kind {
            ModelKind::Onnx => Box::new(OnnxClassifier::load(path, &metadata)?),
            ModelKind::Linear => {
                let linear = LinearClassifier::load(path)?;
                let linear = match &metadata.feature_names {
                    Some(names) => linear.with_feature_names(names.clone())?,
                    None => linear,
                };
                if linear.class_count() != GRADE_COUNT {
                    log::warn!(
                        "Linear model has {} classes, predictions will be rejected (expected {})",
                        linear.class_count(),
                        GRADE_COUNT
                    );
                }
                Box::new(linear)
            }
        };

        Ok(Self::from_parts(classifier, metadata, path))
    }

    /// Assemble from an already-built classifier
    pub fn from_parts(classifier: Box<dyn Classifier>, metadata: ModelMetadata, path: &Path) -> Self {
        let model = Self {
            classifier,
            metadata,
            path: path.to_path_buf(),
            loaded_at: chrono::Utc::now(),
        };

        if let Some(classes) = model.metadata.classes {
            if classes != GRADE_COUNT {
                log::warn!("Model metadata declares {} classes, expected {}", classes, GRADE_COUNT);
            }
        }

        match model.layout_check() {
            LayoutCheck::Exact => log::info!("Feature layout matches model (exact lookup)"),
            LayoutCheck::Drifted { model_version, model_hash } => log::warn!(
                "Model trained on feature layout v{} ({:08x}), current layout differs",
                model_version,
                model_hash
            ),
            LayoutCheck::Unversioned => log::info!("Model records no feature layout version"),
        }

        log::info!(
            "{} model ready: {} ({} expected features)",
            model.kind().as_str(),
            model.path.display(),
            model
                .feature_names()
                .map(|n| n.len().to_string())
                .unwrap_or_else(|| "unnamed".to_string())
        );

        model
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn loaded_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.loaded_at
    }

    pub fn layout_check(&self) -> LayoutCheck {
        self.metadata.layout_check()
    }
}

/// Sidecar names win over names embedded in the artifact
impl Classifier for LoadedModel {
    fn kind(&self) -> ModelKind {
        self.classifier.kind()
    }

    fn predict(&self, row: &[f64]) -> AdapterResult<i64> {
        self.classifier.predict(row)
    }

    fn predict_proba(&self, row: &[f64]) -> AdapterResult<Vec<f64>> {
        self.classifier.predict_proba(row)
    }

    fn classify(&self, row: &[f64]) -> AdapterResult<(i64, Vec<f64>)> {
        self.classifier.classify(row)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.metadata
            .feature_names
            .as_deref()
            .or_else(|| self.classifier.feature_names())
    }

    fn n_features(&self) -> Option<usize> {
        self.feature_names()
            .map(|names| names.len())
            .or_else(|| self.classifier.n_features())
    }

    fn declared_layout(&self) -> Option<(Option<u8>, Option<u32>)> {
        match (self.metadata.feature_version, self.metadata.layout_hash) {
            (None, None) => None,
            declared => Some(declared),
        }
    }
}

// ============================================================================
// GLOBAL HANDLE
// ============================================================================

/// Load the model once; later calls return the same handle
pub fn init(config: &AdapterConfig) -> AdapterResult<&'static LoadedModel> {
    MODEL.get_or_try_init(|| LoadedModel::load(config))
}

/// Loaded handle, or `ModelNotLoaded`
pub fn get() -> AdapterResult<&'static LoadedModel> {
    MODEL.get().ok_or(AdapterError::ModelNotLoaded)
}

// ============================================================================
// ENGINE STATUS
// ============================================================================

/// Engine Status for front ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_path: Option<String>,
    pub model_kind: Option<ModelKind>,
    pub expected_features: Option<usize>,
    pub layout: Option<LayoutCheck>,
    pub loaded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

/// Track one inference
pub fn record_inference(elapsed_us: u64) {
    LATENCY_SUM.fetch_add(elapsed_us, Ordering::Relaxed);
    INFERENCE_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn get_status() -> EngineStatus {
    let sum = LATENCY_SUM.load(Ordering::Relaxed);
    let count = INFERENCE_COUNT.load(Ordering::Relaxed);
    let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

    let model = MODEL.get();

    EngineStatus {
        model_loaded: model.is_some(),
        model_path: model.map(|m| m.path().display().to_string()),
        model_kind: model.map(|m| m.kind()),
        expected_features: model.and_then(|m| m.n_features()),
        layout: model.map(|m| m.layout_check()),
        loaded_at: model.map(|m| m.loaded_at()),
        avg_latency_ms: avg,
        inference_count: count,
    }
}

// ============================================================================
// TESTS
// ============================================================================
