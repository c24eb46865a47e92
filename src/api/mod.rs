//! API Module
//!
//! Structure:
//! - commands.rs: Prediction and catalog commands, JSON-lines dispatch
//! - engine_status.rs: Layout + model status report

pub mod commands;
pub mod engine_status;

// Re-export current version as default
pub use commands::*;
