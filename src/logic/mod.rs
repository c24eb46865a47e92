//! Logic Module - Feature engineering, model backends and the inference adapter
//!
//! - `params/` - Raw parameters, validation, rock-type catalog
//! - `features/` - Raw layout, engineered catalog, alignment
//! - `model/` - Classifier backends (ONNX, linear) and the load-once handle
//! - `adapter` - align_and_predict

pub mod error;
pub mod config;
pub mod params;
pub mod features;
pub mod model;
pub mod adapter;
pub mod grade;
pub mod advice;
