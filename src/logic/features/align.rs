//! Feature Alignment - Match computed features to a model's expected names
//!
//! The aligned vector always has exactly the expected names, in the expected
//! order. Raw values are placed first, then engineered catalog values; any
//! name neither provides stays at 0.0 and is reported.

use serde::{Deserialize, Serialize};

use super::engineering;
use super::layout::{raw_feature_index, RAW_FEATURE_COUNT};
use super::vector::FeatureVector;
use crate::logic::params::RawParameters;

/// How the model input was assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Model exposed its feature names
    Named,
    /// Model exposed no names, raw seven-feature row fed directly
    RawPassthrough,
}

/// Diagnostics for one alignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub mode: AlignmentMode,
    pub expected: usize,
    pub from_raw: usize,
    pub from_catalog: usize,
    pub zero_filled: Vec<String>,
}

impl AlignmentReport {
    /// Every expected name received a computed value
    pub fn is_exact(&self) -> bool {
        self.zero_filled.is_empty()
    }
}

/// Build the model input over exactly `expected` names.
pub fn align<S: AsRef<str>>(raw: &RawParameters, expected: &[S]) -> (FeatureVector, AlignmentReport) {
    let row = raw.as_row();
    let catalog = engineering::engineer(raw);
    let mut vector = FeatureVector::zeroed(expected);

    let mut from_raw = 0;
    let mut from_catalog = 0;
    let mut zero_filled = Vec::new();

    for (index, name) in expected.iter().enumerate() {
        let name: &str = name.as_ref();
        if let Some(raw_index) = raw_feature_index(name) {
            vector.set(index, row[raw_index]);
            from_raw += 1;
        } else if let Some(value) = catalog.get_by_name(name) {
            vector.set(index, value);
            from_catalog += 1;
        } else {
            zero_filled.push(name.to_string());
        }
    }

    if !zero_filled.is_empty() {
        log::warn!(
            "Feature drift: {}/{} expected features have no computed value, zero-filled (first: {:?})",
            zero_filled.len(),
            expected.len(),
            zero_filled.first()
        );
    }

    log::debug!(
        "Aligned {} features ({} raw, {} engineered, {} zero-filled)",
        vector.len(),
        from_raw,
        from_catalog,
        zero_filled.len()
    );

    let report = AlignmentReport {
        mode: AlignmentMode::Named,
        expected: expected.len(),
        from_raw,
        from_catalog,
        zero_filled,
    };

    (vector, report)
}

/// Raw seven-feature row, for models that expose no feature names.
pub fn passthrough(raw: &RawParameters) -> (FeatureVector, AlignmentReport) {
    let vector = FeatureVector::from_pairs(raw.named_values().map(|(n, v)| (n.to_string(), v)));

    let report = AlignmentReport {
        mode: AlignmentMode::RawPassthrough,
        expected: RAW_FEATURE_COUNT,
        from_raw: RAW_FEATURE_COUNT,
        from_catalog: 0,
        zero_filled: Vec::new(),
    };

    (vector, report)
}

// ============================================================================
// TESTS
// ============================================================================
