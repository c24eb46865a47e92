//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every value can be overridden through the environment (or a `.env` file).

/// Default model artifact path
///
/// `.onnx` selects the ONNX backend, `.json` the linear (softmax) backend.
pub const DEFAULT_MODEL_PATH: &str = "models/rockburst_classifier.onnx";

/// Suffix of the sidecar metadata file written next to the model at training time
pub const METADATA_SUFFIX: &str = ".meta.json";

/// Epsilon added to every denominator in ratio features
pub const RATIO_EPSILON: f64 = 1e-8;

/// Number of rock-burst grades the classifier must produce
pub const GRADE_COUNT: usize = 4;

/// Tolerance for the probability-sum check
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Rock-Burst Grade Predictor";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("ROCKBURST_MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get explicit metadata path from environment (None = derive from model path)
pub fn get_metadata_path() -> Option<String> {
    std::env::var("ROCKBURST_MODEL_METADATA")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Check if model checksum verification is enabled
pub fn is_checksum_verification_enabled() -> bool {
    env_flag("ROCKBURST_VERIFY_CHECKSUM", true)
}

/// Check if a feature layout mismatch should be rejected instead of zero-filled
pub fn is_strict_layout() -> bool {
    env_flag("ROCKBURST_STRICT_LAYOUT", false)
}

/// Check if zero compressive/tensile strength is accepted (epsilon-guarded)
pub fn is_zero_strength_allowed() -> bool {
    env_flag("ROCKBURST_ALLOW_ZERO_STRENGTH", false)
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|s| parse_flag(&s, default))
        .unwrap_or(default)
}

fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true", false));
        assert!(parse_flag(" YES ", false));
        assert!(!parse_flag("0", true));
        assert!(!parse_flag("off", true));
        assert!(parse_flag("garbage", true));
        assert!(!parse_flag("garbage", false));
    }
}
