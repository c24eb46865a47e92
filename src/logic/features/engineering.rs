//! Feature Engineering - Engineered catalog over the raw columns
//!
//! Every raw column pair (i < j, layout order) contributes a ratio, a product
//! and a sum; every raw column then contributes square, cube, sqrt and log
//! transforms. Catalog order is part of the layout hash.

use once_cell::sync::Lazy;
use serde::Serialize;

use super::layout::{RAW_FEATURE_COUNT, RAW_FEATURE_LAYOUT};
use super::vector::FeatureVector;
use crate::constants::RATIO_EPSILON;
use crate::logic::params::RawParameters;

/// 7 raw + 21 pairs × 3 + 7 × 4
pub const CATALOG_SIZE: usize =
    RAW_FEATURE_COUNT + RAW_FEATURE_COUNT * (RAW_FEATURE_COUNT - 1) / 2 * 3 + RAW_FEATURE_COUNT * 4;

/// Division with the epsilon guard on the denominator
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    numerator / (denominator + RATIO_EPSILON)
}

// ============================================================================
// TRANSFORMS
// ============================================================================

/// One catalog entry, indices refer to RAW_FEATURE_LAYOUT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transform {
    Raw(usize),
    Ratio(usize, usize),
    Product(usize, usize),
    Sum(usize, usize),
    Squared(usize),
    Cubed(usize),
    Sqrt(usize),
    Log(usize),
}

impl Transform {
    /// Feature name as the training pipeline spelled it
    pub fn name(&self) -> String {
        let col = |i: usize| RAW_FEATURE_LAYOUT[i];
        match *self {
            Transform::Raw(i) => col(i).to_string(),
            Transform::Ratio(a, b) => format!("{}_{}_ratio", col(a), col(b)),
            Transform::Product(a, b) => format!("{}_{}_product", col(a), col(b)),
            Transform::Sum(a, b) => format!("{}_{}_sum", col(a), col(b)),
            Transform::Squared(i) => format!("{}_squared", col(i)),
            Transform::Cubed(i) => format!("{}_cubed", col(i)),
            Transform::Sqrt(i) => format!("{}_sqrt", col(i)),
            Transform::Log(i) => format!("{}_log", col(i)),
        }
    }

    pub fn apply(&self, row: &[f64; RAW_FEATURE_COUNT]) -> f64 {
        match *self {
            Transform::Raw(i) => row[i],
            Transform::Ratio(a, b) => guarded_ratio(row[a], row[b]),
            Transform::Product(a, b) => row[a] * row[b],
            Transform::Sum(a, b) => row[a] + row[b],
            Transform::Squared(i) => row[i].powi(2),
            Transform::Cubed(i) => row[i].powi(3),
            Transform::Sqrt(i) => row[i].abs().sqrt(),
            Transform::Log(i) => row[i].abs().ln_1p(),
        }
    }
}

static CATALOG: Lazy<Vec<(String, Transform)>> = Lazy::new(|| {
    build_catalog()
        .into_iter()
        .map(|t| (t.name(), t))
        .collect()
});

fn build_catalog() -> Vec<Transform> {
    let mut catalog = Vec::with_capacity(CATALOG_SIZE);

    catalog.extend((0..RAW_FEATURE_COUNT).map(Transform::Raw));

    for a in 0..RAW_FEATURE_COUNT {
        for b in (a + 1)..RAW_FEATURE_COUNT {
            catalog.push(Transform::Ratio(a, b));
            catalog.push(Transform::Product(a, b));
            catalog.push(Transform::Sum(a, b));
        }
    }

    for i in 0..RAW_FEATURE_COUNT {
        catalog.push(Transform::Squared(i));
        catalog.push(Transform::Cubed(i));
        catalog.push(Transform::Sqrt(i));
        catalog.push(Transform::Log(i));
    }

    catalog
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Catalog feature names in order
pub fn feature_names() -> Vec<String> {
    CATALOG.iter().map(|(name, _)| name.clone()).collect()
}

/// Compute the full engineered catalog for one submission
pub fn engineer(raw: &RawParameters) -> FeatureVector {
    let row = raw.as_row();
    FeatureVector::from_pairs(CATALOG.iter().map(|(name, t)| (name.clone(), t.apply(&row))))
}

// ============================================================================
// TESTS
// ============================================================================
