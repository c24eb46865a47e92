//! Model Metadata - Sidecar written next to the artifact at training time
//!
//! Records the feature names, feature-engineering version and layout hash
//! the model was fit on, so inference-time alignment is an exact lookup
//! instead of a reconstruction. Also carries an optional SHA-256 of the
//! model file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::ModelKind;
use crate::constants::METADATA_SUFFIX;
use crate::logic::error::{AdapterError, AdapterResult};
use crate::logic::features::layout::{layout_hash, validate_layout, FEATURE_VERSION};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub model_type: Option<ModelKind>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub feature_version: Option<u8>,
    #[serde(default)]
    pub layout_hash: Option<u32>,
    #[serde(default)]
    pub classes: Option<usize>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub trained_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    /// ONNX output holding the label (default: first output)
    #[serde(default)]
    pub label_output: Option<String>,
    /// ONNX output holding probabilities (default: second output)
    #[serde(default)]
    pub probability_output: Option<String>,
}

impl ModelMetadata {
    /// `models/classifier.onnx` → `models/classifier.meta.json`
    pub fn sidecar_path(model_path: &Path) -> PathBuf {
        let stem = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        model_path.with_file_name(format!("{}{}", stem, METADATA_SUFFIX))
    }

    /// Load metadata from JSON file
    pub fn load(path: &Path) -> AdapterResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AdapterError::Metadata(format!("Failed to read {}: {}", path.display(), e)))?;

        let metadata: ModelMetadata = serde_json::from_str(&content)
            .map_err(|e| AdapterError::Metadata(format!("Failed to parse {}: {}", path.display(), e)))?;

        if let Some(names) = &metadata.feature_names {
            if names.is_empty() {
                return Err(AdapterError::Metadata("feature_names must not be empty".to_string()));
            }
        }

        log::info!("Model metadata loaded from: {}", path.display());
        Ok(metadata)
    }

    /// Explicit path, or the sidecar if one exists, or empty metadata
    pub fn resolve(model_path: &Path, explicit: Option<&Path>) -> AdapterResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let sidecar = Self::sidecar_path(model_path);
        if sidecar.exists() {
            Self::load(&sidecar)
        } else {
            log::info!("No metadata sidecar at {}, relying on the model itself", sidecar.display());
            Ok(Self::default())
        }
    }

    pub fn layout_check(&self) -> LayoutCheck {
        LayoutCheck::from_declared(self.feature_version, self.layout_hash)
    }
}

// ============================================================================
// LAYOUT CHECK
// ============================================================================

/// How the model's recorded feature layout compares with the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum LayoutCheck {
    /// Same version and hash: alignment is an exact lookup
    Exact,
    /// Trained against a different feature-engineering layout
    Drifted { model_version: u8, model_hash: u32 },
    /// Model recorded no layout
    Unversioned,
}

impl LayoutCheck {
    /// Missing halves are not compared
    pub fn from_declared(version: Option<u8>, hash: Option<u32>) -> Self {
        if version.is_none() && hash.is_none() {
            return LayoutCheck::Unversioned;
        }

        let version = version.unwrap_or(FEATURE_VERSION);
        let hash = hash.unwrap_or_else(layout_hash);

        match validate_layout(version, hash) {
            Ok(()) => LayoutCheck::Exact,
            Err(e) => LayoutCheck::Drifted {
                model_version: e.actual_version,
                model_hash: e.actual_hash,
            },
        }
    }
}

// ============================================================================
// CHECKSUM
// ============================================================================

/// SHA-256 of a file, lowercase hex
pub fn sha256_file(path: &Path) -> AdapterResult<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| AdapterError::ModelLoad(format!("Failed to read {}: {}", path.display(), e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Verify model file against the expected checksum
pub fn verify_checksum(path: &Path, expected: &str) -> AdapterResult<()> {
    let actual = sha256_file(path)?;
    let expected = expected.trim().to_lowercase();

    if actual != expected {
        return Err(AdapterError::ChecksumMismatch { expected, actual });
    }

    log::debug!("Model checksum verified: {}", actual);
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
