//! Params Module - Raw rock-mechanics parameters
//!
//! Seven named scalars per submission. The two ratios are always derived
//! from the three measured stresses, never taken from the caller.

pub mod rock_type;

use serde::Serialize;

use crate::logic::error::{AdapterError, AdapterResult};
use crate::logic::features::engineering::guarded_ratio;
use crate::logic::features::layout::{RAW_FEATURE_COUNT, RAW_FEATURE_LAYOUT};

pub use rock_type::{RockType, ROCK_TYPES};

// ============================================================================
// ADVISORY RANGES
// ============================================================================

/// Input range the training data covers
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParameterRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

pub const SIGMA_THETA_RANGE: ParameterRange = ParameterRange { name: "sigma_theta", min: 10.0, max: 200.0 };
pub const SIGMA_C_RANGE: ParameterRange = ParameterRange { name: "sigma_c", min: 20.0, max: 300.0 };
pub const SIGMA_T_RANGE: ParameterRange = ParameterRange { name: "sigma_t", min: 1.0, max: 50.0 };
pub const WET_RANGE: ParameterRange = ParameterRange { name: "wet", min: 0.0, max: 1.0 };

impl ParameterRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

// ============================================================================
// RAW PARAMETERS
// ============================================================================

/// One submission of rock parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawParameters {
    rock_type: f64,
    sigma_theta: f64,
    sigma_c: f64,
    sigma_t: f64,
    sigma_theta_c_ratio: f64,
    sigma_c_t_ratio: f64,
    wet: f64,
}

impl RawParameters {
    /// Build from the independent measurements, deriving both ratios.
    ///
    /// Never fails: denominators carry the epsilon guard, so a zero strength
    /// yields a large finite ratio. Call [`RawParameters::validate`] before inference.
    pub fn from_measurements(rock_type: f64, sigma_theta: f64, sigma_c: f64, sigma_t: f64, wet: f64) -> Self {
        Self {
            rock_type,
            sigma_theta,
            sigma_c,
            sigma_t,
            sigma_theta_c_ratio: guarded_ratio(sigma_theta, sigma_c),
            sigma_c_t_ratio: guarded_ratio(sigma_c, sigma_t),
            wet,
        }
    }

    pub fn rock_type(&self) -> f64 { self.rock_type }
    pub fn sigma_theta(&self) -> f64 { self.sigma_theta }
    pub fn sigma_c(&self) -> f64 { self.sigma_c }
    pub fn sigma_t(&self) -> f64 { self.sigma_t }
    pub fn sigma_theta_c_ratio(&self) -> f64 { self.sigma_theta_c_ratio }
    pub fn sigma_c_t_ratio(&self) -> f64 { self.sigma_c_t_ratio }
    pub fn wet(&self) -> f64 { self.wet }

    /// Values in raw layout order
    pub fn as_row(&self) -> [f64; RAW_FEATURE_COUNT] {
        [
            self.rock_type,
            self.sigma_theta,
            self.sigma_c,
            self.sigma_t,
            self.sigma_theta_c_ratio,
            self.sigma_c_t_ratio,
            self.wet,
        ]
    }

    /// (display label, value) pairs in raw layout order
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        RAW_FEATURE_LAYOUT.into_iter().zip(self.as_row())
    }

    /// Reject values that would produce a silently wrong prediction.
    pub fn validate(&self, allow_zero_strength: bool) -> AdapterResult<()> {
        for (name, value) in [("σc", self.sigma_c), ("σt", self.sigma_t)] {
            if value < 0.0 {
                return Err(AdapterError::InvalidInput(format!(
                    "{} must not be negative, got {}", name, value
                )));
            }
        }

        for (name, value) in self.named_values() {
            if !value.is_finite() {
                return Err(AdapterError::InvalidInput(format!(
                    "{} must be finite, got {}", name, value
                )));
            }
        }

        if !allow_zero_strength {
            if self.sigma_c == 0.0 {
                return Err(AdapterError::InvalidInput(
                    "σc must be nonzero (σθ/σc divides by it)".to_string(),
                ));
            }
            if self.sigma_t == 0.0 {
                return Err(AdapterError::InvalidInput(
                    "σt must be nonzero (σc/σt divides by it)".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Advisory warnings for values outside the trained input ranges
    pub fn range_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if rock_type::by_code(self.rock_type).is_none() {
            warnings.push(format!("rock_type {} is not a known rock type code", self.rock_type));
        }

        for (range, value) in [
            (SIGMA_THETA_RANGE, self.sigma_theta),
            (SIGMA_C_RANGE, self.sigma_c),
            (SIGMA_T_RANGE, self.sigma_t),
            (WET_RANGE, self.wet),
        ] {
            if !range.contains(value) {
                warnings.push(format!(
                    "{} = {} is outside the trained range [{}, {}]",
                    range.name, value, range.min, range.max
                ));
            }
        }

        warnings
    }
}

// ============================================================================
// TESTS
// ============================================================================
