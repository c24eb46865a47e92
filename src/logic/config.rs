//! Configuration module

use std::path::PathBuf;

use crate::constants;

/// Adapter configuration
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Model artifact (.onnx or .json)
    pub model_path: PathBuf,

    /// Explicit metadata file (None = `<model>.meta.json` if present)
    pub metadata_path: Option<PathBuf>,

    /// Verify model SHA-256 against metadata
    pub verify_checksum: bool,

    /// Reject models trained on a different feature layout
    pub strict_layout: bool,

    /// Accept σc = 0 or σt = 0 (ratios fall back to the epsilon guard)
    pub allow_zero_strength: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(constants::DEFAULT_MODEL_PATH),
            metadata_path: None,
            verify_checksum: true,
            strict_layout: false,
            allow_zero_strength: false,
        }
    }
}

impl AdapterConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_path: PathBuf::from(constants::get_model_path()),
            metadata_path: constants::get_metadata_path().map(PathBuf::from),
            verify_checksum: constants::is_checksum_verification_enabled(),
            strict_layout: constants::is_strict_layout(),
            allow_zero_strength: constants::is_zero_strength_allowed(),
        }
    }

    /// Per-request options derived from this config
    pub fn options(&self) -> AdapterOptions {
        AdapterOptions {
            strict_layout: self.strict_layout,
            allow_zero_strength: self.allow_zero_strength,
        }
    }
}

/// Options the adapter needs per call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdapterOptions {
    pub strict_layout: bool,
    pub allow_zero_strength: bool,
}
