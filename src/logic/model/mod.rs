//! Model Module - Classifier backends and the shared model handle
//!
//! Backends sit behind the `Classifier` trait so the adapter never cares
//! whether the artifact is an ONNX graph or a JSON linear model.

pub mod classifier;
pub mod metadata;
pub mod linear;
pub mod onnx;
pub mod store;

// Re-export common types
pub use classifier::{Classifier, ModelKind};
pub use metadata::{LayoutCheck, ModelMetadata};
pub use store::{EngineStatus, LoadedModel};
