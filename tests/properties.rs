//! Property-based tests for the inference adapter.
//!
//! Uses proptest to check the output contract and alignment invariants over
//! random, physically plausible submissions.

use proptest::prelude::*;
use rockburst_core::logic::features::{align, engineering, RAW_FEATURE_LAYOUT};
use rockburst_core::logic::model::linear::{LinearClassifier, LinearModel, StandardScaler};
use rockburst_core::logic::model::LoadedModel;
use rockburst_core::{align_and_predict, AdapterConfig, AdapterError, AdapterOptions, RawParameters, RockBurstGrade};

/// Probability-sum tolerance from the output contract.
const TOL: f64 = 1e-6;

fn params() -> impl Strategy<Value = RawParameters> {
    (1u8..=21, 10.0..200.0f64, 20.0..300.0f64, 1.0..50.0f64, 0.0..=1.0f64).prop_map(
        |(rock, theta, c, t, wet)| RawParameters::from_measurements(rock as f64, theta, c, t, wet),
    )
}

/// Raw features, two engineered ones, and one the catalog has never heard of.
fn expected_names() -> Vec<String> {
    let mut names: Vec<String> = RAW_FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
    names.push("σθ / Mpa_σc / Mpa_ratio".to_string());
    names.push("Wet_squared".to_string());
    names.push("depth_m".to_string());
    names
}

fn model(weights: Vec<f64>) -> LinearClassifier {
    let names = expected_names();
    let width = names.len();
    let coefficients = (0..4)
        .map(|class| weights.iter().skip(class * width).take(width).copied().collect())
        .collect();

    LinearClassifier::new(LinearModel {
        feature_names: Some(names),
        coefficients,
        intercepts: vec![0.5, 0.0, -0.25, 0.1],
        scaler: Some(StandardScaler {
            mean: vec![10.0, 100.0, 150.0, 20.0, 0.7, 15.0, 0.5, 0.7, 0.3, 0.0],
            scale: vec![6.0, 50.0, 70.0, 12.0, 0.5, 10.0, 0.3, 0.5, 0.3, 1.0],
        }),
    })
    .unwrap()
}

fn weights() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-3.0..3.0f64, 4 * 10)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Ratio fields always come from the stresses.
    #[test]
    fn ratios_are_derived(raw in params()) {
        let expected_theta_c = raw.sigma_theta() / (raw.sigma_c() + 1e-8);
        let expected_c_t = raw.sigma_c() / (raw.sigma_t() + 1e-8);
        prop_assert!((raw.sigma_theta_c_ratio() - expected_theta_c).abs() < 1e-9);
        prop_assert!((raw.sigma_c_t_ratio() - expected_c_t).abs() < 1e-9);
    }

    /// Probabilities form a distribution over exactly four grades.
    #[test]
    fn probabilities_form_distribution(raw in params(), w in weights()) {
        let result = align_and_predict(&raw, &model(w), &AdapterOptions::default()).unwrap();

        prop_assert_eq!(result.probabilities.len(), 4);
        prop_assert!(result.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
        let sum: f64 = result.probabilities.iter().sum();
        prop_assert!((sum - 1.0).abs() <= TOL, "sum = {}", sum);
    }

    /// Label stays in 0..=3 and its text matches the grade.
    #[test]
    fn label_and_text_agree(raw in params(), w in weights()) {
        let result = align_and_predict(&raw, &model(w), &AdapterOptions::default()).unwrap();

        prop_assert!(result.label <= 3);
        let grade = RockBurstGrade::from_label(result.label as i64).unwrap();
        prop_assert_eq!(grade, result.grade);
        prop_assert_eq!(result.grade_text.as_str(), grade.text());
    }

    /// The aligned vector always has the model's width, unknown names read 0.
    #[test]
    fn aligned_width_matches_model(raw in params()) {
        let names = expected_names();
        let (vector, report) = align(&raw, names.as_slice());

        prop_assert_eq!(vector.len(), names.len());
        prop_assert_eq!(vector.get_by_name("depth_m"), Some(0.0));
        prop_assert_eq!(report.zero_filled, vec!["depth_m".to_string()]);
        prop_assert_eq!(vector.get_by_name("Wet_squared"), Some(raw.wet() * raw.wet()));
    }

    /// Same input, same model, same answer.
    #[test]
    fn prediction_is_idempotent(raw in params(), w in weights()) {
        let model = model(w);
        let options = AdapterOptions::default();
        let first = align_and_predict(&raw, &model, &options).unwrap();
        let second = align_and_predict(&raw, &model, &options).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Every engineered feature is finite for plausible input.
    #[test]
    fn engineered_catalog_is_finite(raw in params()) {
        let vector = engineering::engineer(&raw);
        prop_assert_eq!(vector.len(), engineering::CATALOG_SIZE);
        prop_assert!(vector.values().iter().all(|v| v.is_finite()));
    }

    /// Zero strengths still derive finite ratios; validation decides whether they pass.
    #[test]
    fn zero_strength_is_finite(theta in 10.0..200.0f64, t in 1.0..50.0f64, w in weights()) {
        let raw = RawParameters::from_measurements(1.0, theta, 0.0, t, 0.5);
        prop_assert!(raw.sigma_theta_c_ratio().is_finite());

        let rejected = align_and_predict(&raw, &model(w.clone()), &AdapterOptions::default());
        prop_assert!(matches!(rejected, Err(AdapterError::InvalidInput(_))));

        let options = AdapterOptions { allow_zero_strength: true, ..AdapterOptions::default() };
        let accepted = align_and_predict(&raw, &model(w), &options);
        prop_assert!(accepted.is_ok());
    }
}

#[test]
fn missing_model_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = AdapterConfig {
        model_path: dir.path().join("absent.onnx"),
        ..AdapterConfig::default()
    };

    let err = LoadedModel::load(&config).err().unwrap();
    assert!(matches!(err, AdapterError::ModelNotFound(_)));
    assert!(err.is_fatal());
}
