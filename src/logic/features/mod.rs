//! Features Module - Feature Engineering & Alignment
//!
//! Raw layout, the versioned engineered catalog, and alignment of both onto
//! whatever feature names a trained model expects.

pub mod layout;
pub mod engineering;
pub mod vector;
pub mod align;

// Re-export common types
pub use align::{align, passthrough, AlignmentMode, AlignmentReport};
pub use engineering::{engineer, CATALOG_SIZE};
pub use layout::{LayoutInfo, FEATURE_VERSION, RAW_FEATURE_COUNT, RAW_FEATURE_LAYOUT};
pub use vector::FeatureVector;
