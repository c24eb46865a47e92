//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema shared with model artifacts**
//!
//! ## Rules (NEVER break these):
//! 1. Rename a raw feature → increment FEATURE_VERSION
//! 2. Change raw order → increment FEATURE_VERSION
//! 3. Change the engineered catalog (names or formulas) → increment FEATURE_VERSION
//!
//! Model sidecar metadata records the version and hash it was trained with,
//! so inference can tell an exact layout from a drifted one.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::engineering;
use super::vector::FeatureVector;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature-engineering version
/// MUST be incremented when the layout or the engineered catalog changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// RAW FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Raw feature names in exact column order.
/// Artifacts key features by these display labels, spelling and units included.
pub const RAW_FEATURE_LAYOUT: [&str; RAW_FEATURE_COUNT] = [
    "岩石种类",  // 0: rock type code
    "σθ / Mpa",  // 1: tangential (in-situ) stress
    "σc / Mpa",  // 2: uniaxial compressive strength
    "σt / MPa",  // 3: tensile strength
    "σθ/σc",     // 4: stress ratio (derived)
    "σc/σt",     // 5: strength ratio (derived)
    "Wet",       // 6: moisture content
];

/// Total number of raw features
pub const RAW_FEATURE_COUNT: usize = 7;

// ============================================================================
// LAYOUT HASH
// ============================================================================

static LAYOUT_HASH: Lazy<u32> = Lazy::new(compute_layout_hash);

/// Compute CRC32 hash of the full engineered layout
pub fn compute_layout_hash() -> u32 {
    FeatureVector::zeroed(engineering::feature_names().as_slice()).schema_hash()
}

/// Layout hash (computed once)
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub raw_features: Vec<String>,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        let feature_names = engineering::feature_names();
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            raw_features: RAW_FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            feature_count: feature_names.len(),
            feature_names,
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a model was trained against a different feature layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that a model's recorded layout matches the current one
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get raw feature index by name
pub fn raw_feature_index(name: &str) -> Option<usize> {
    RAW_FEATURE_LAYOUT.iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================
