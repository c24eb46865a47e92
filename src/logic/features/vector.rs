//! Feature Vector - Core data structure for ML input
//!
//! **Ordered, named feature vector**
//!
//! The name set is fixed at construction (either the engineered catalog or
//! the exact names a model expects); values can only be set for names that
//! already exist, so the vector never grows or shrinks after creation.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::layout::FEATURE_VERSION;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature-engineering version that produced the values
    pub version: u8,
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Zero-initialised vector over exactly `names`, in that order
    pub fn zeroed<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            version: FEATURE_VERSION,
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
            values: vec![0.0; names.len()],
        }
    }

    /// Build from (name, value) pairs, keeping their order
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let (names, values) = pairs.into_iter().unzip();
        Self {
            version: FEATURE_VERSION,
            names,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate (name, value) in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Set feature by index (ignored when out of range)
    pub fn set(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Get feature index by name (O(n), vectors are at most a few hundred wide)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        self.index_of(name).and_then(|i| self.get(i))
    }

    /// CRC32 over version and names, same scheme as the layout hash
    pub fn schema_hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&[self.version]);
        for name in &self.names {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize()
    }
}

// ============================================================================
// TESTS
// ============================================================================
