//! Rock-Burst Grade Predictor - Core Library
//!
//! Seven rock-mechanics parameters in, a rock-burst grade (0..=3) with
//! per-class probabilities out.

pub mod api;
pub mod constants;
pub mod logic;

pub use logic::adapter::{align_and_predict, PredictionResult};
pub use logic::config::{AdapterConfig, AdapterOptions};
pub use logic::error::{AdapterError, AdapterResult};
pub use logic::grade::RockBurstGrade;
pub use logic::model::Classifier;
pub use logic::params::RawParameters;
