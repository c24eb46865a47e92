//! Inference Adapter - Raw parameters in, validated grade prediction out
//!
//! Pure function of its inputs plus the model: validate, align features to
//! what the model expects, invoke it once, and check the output against the
//! four-grade contract.

use serde::{Deserialize, Serialize};

use crate::constants::{GRADE_COUNT, PROBABILITY_TOLERANCE};
use crate::logic::config::AdapterOptions;
use crate::logic::error::{AdapterError, AdapterResult};
use crate::logic::features::layout::{validate_layout, FEATURE_VERSION, RAW_FEATURE_COUNT};
use crate::logic::features::{align, passthrough, AlignmentReport, FeatureVector};
use crate::logic::grade::RockBurstGrade;
use crate::logic::model::{store, Classifier, LayoutCheck, ModelKind};
use crate::logic::params::RawParameters;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: u8,
    pub grade: RockBurstGrade,
    pub grade_text: String,
    /// Indexed by label
    pub probabilities: [f64; GRADE_COUNT],
    pub model_kind: ModelKind,
    pub alignment: AlignmentReport,
    pub layout: LayoutCheck,
}

impl PredictionResult {
    pub fn probability_of(&self, grade: RockBurstGrade) -> f64 {
        self.probabilities[grade.label() as usize]
    }

    /// Probability assigned to the predicted grade
    pub fn confidence(&self) -> f64 {
        self.probability_of(self.grade)
    }
}

// ============================================================================
// ADAPTER
// ============================================================================

/// Validate, align, invoke the model, check its output.
pub fn align_and_predict(
    raw: &RawParameters,
    model: &dyn Classifier,
    options: &AdapterOptions,
) -> AdapterResult<PredictionResult> {
    raw.validate(options.allow_zero_strength)?;

    let layout = check_layout(model, options)?;
    let (vector, alignment) = build_input(raw, model)?;

    if let Some((name, value)) = vector.iter().find(|(_, v)| !v.is_finite()) {
        return Err(AdapterError::InvalidInput(format!(
            "engineered feature {} is not finite ({})",
            name, value
        )));
    }

    if layout == LayoutCheck::Exact && !alignment.is_exact() {
        log::warn!(
            "Model declares the current layout but {} feature names are outside the catalog",
            alignment.zero_filled.len()
        );
    }

    let (label, probabilities) = model.classify(vector.values())?;
    let (grade, probabilities) = check_outputs(label, &probabilities)?;

    let result = PredictionResult {
        label: grade.label(),
        grade,
        grade_text: grade.text().to_string(),
        probabilities,
        model_kind: model.kind(),
        alignment,
        layout,
    };

    log::debug!(
        "Predicted {} with p={:.3} ({} features)",
        result.grade,
        result.confidence(),
        vector.len()
    );

    Ok(result)
}

/// Predict with the process-wide model handle
pub fn predict(raw: &RawParameters, options: &AdapterOptions) -> AdapterResult<PredictionResult> {
    let model = store::get()?;
    predict_timed(raw, model, options, store::record_inference)
}

/// `align_and_predict`, reporting latency in microseconds for successful
/// predictions only
fn predict_timed(
    raw: &RawParameters,
    model: &dyn Classifier,
    options: &AdapterOptions,
    record: impl FnOnce(u64),
) -> AdapterResult<PredictionResult> {
    let start_time = std::time::Instant::now();
    let result = align_and_predict(raw, model, options)?;
    record(start_time.elapsed().as_micros() as u64);

    Ok(result)
}

fn check_layout(model: &dyn Classifier, options: &AdapterOptions) -> AdapterResult<LayoutCheck> {
    let Some((version, hash)) = model.declared_layout() else {
        return Ok(LayoutCheck::Unversioned);
    };

    let check = LayoutCheck::from_declared(version, hash);

    if let LayoutCheck::Drifted { model_version, model_hash } = check {
        if options.strict_layout {
            validate_layout(model_version, model_hash)?;
        }
        log::warn!(
            "Model feature layout v{} ({:08x}) differs from current v{}; zero-filling unknown features",
            model_version,
            model_hash,
            FEATURE_VERSION
        );
    }

    Ok(check)
}

fn build_input(raw: &RawParameters, model: &dyn Classifier) -> AdapterResult<(FeatureVector, AlignmentReport)> {
    match model.feature_names() {
        Some(names) if !names.is_empty() => Ok(align(raw, names)),
        _ => {
            if let Some(expected) = model.n_features() {
                if expected != RAW_FEATURE_COUNT {
                    return Err(AdapterError::FeatureShape {
                        expected,
                        actual: RAW_FEATURE_COUNT,
                    });
                }
            }
            log::debug!("Model exposes no feature names, feeding raw row");
            Ok(passthrough(raw))
        }
    }
}

/// Enforce the four-grade output contract
pub fn check_outputs(label: i64, probabilities: &[f64]) -> AdapterResult<(RockBurstGrade, [f64; GRADE_COUNT])> {
    if probabilities.len() != GRADE_COUNT {
        return Err(AdapterError::ClassCountMismatch {
            expected: GRADE_COUNT,
            actual: probabilities.len(),
        });
    }

    let grade = RockBurstGrade::from_label(label).ok_or(AdapterError::LabelOutOfRange(label))?;

    if let Some(p) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(AdapterError::InvalidProbabilities(format!(
            "probability {} outside [0, 1]",
            p
        )));
    }

    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(AdapterError::InvalidProbabilities(format!(
            "probabilities sum to {}, expected 1",
            sum
        )));
    }

    let mut fixed = [0.0; GRADE_COUNT];
    fixed.copy_from_slice(probabilities);
    Ok((grade, fixed))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{engineering, AlignmentMode};
    use crate::logic::features::layout::layout_hash;
    use crate::logic::model::linear::{LinearClassifier, LinearModel};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fixed-output classifier that records the width it was called with
    struct StubClassifier {
        names: Option<Vec<String>>,
        width: Option<usize>,
        label: i64,
        probabilities: Vec<f64>,
        layout: Option<(Option<u8>, Option<u32>)>,
        seen_width: AtomicUsize,
    }

    impl StubClassifier {
        fn new(names: Option<Vec<String>>) -> Self {
            Self {
                names,
                width: None,
                label: 2,
                probabilities: vec![0.1, 0.2, 0.6, 0.1],
                layout: None,
                seen_width: AtomicUsize::new(0),
            }
        }
    }

    impl Classifier for StubClassifier {
        fn kind(&self) -> ModelKind {
            ModelKind::Linear
        }

        fn predict(&self, row: &[f64]) -> AdapterResult<i64> {
            self.seen_width.store(row.len(), Ordering::Relaxed);
            Ok(self.label)
        }

        fn predict_proba(&self, _row: &[f64]) -> AdapterResult<Vec<f64>> {
            Ok(self.probabilities.clone())
        }

        fn feature_names(&self) -> Option<&[String]> {
            self.names.as_deref()
        }

        fn n_features(&self) -> Option<usize> {
            self.width.or_else(|| self.names.as_ref().map(Vec::len))
        }

        fn declared_layout(&self) -> Option<(Option<u8>, Option<u32>)> {
            self.layout
        }
    }

    fn sample() -> RawParameters {
        RawParameters::from_measurements(1.0, 50.0, 100.0, 10.0, 0.5)
    }

    fn catalog_linear() -> LinearClassifier {
        let names = engineering::feature_names();
        let width = names.len();
        let coefficients = (0..GRADE_COUNT)
            .map(|class| (0..width).map(|i| ((i * 7 + class * 3) % 11) as f64 * 1e-4 - 5e-4).collect())
            .collect();
        LinearClassifier::new(LinearModel {
            feature_names: Some(names),
            coefficients,
            intercepts: vec![0.2, 0.1, 0.0, -0.1],
            scaler: None,
        })
        .unwrap()
    }

    #[test]
    fn test_named_alignment_feeds_exact_width() {
        let names = vec!["Wet".to_string(), "σθ/σc_squared".to_string(), "unknown".to_string()];
        let stub = StubClassifier::new(Some(names));

        let result = align_and_predict(&sample(), &stub, &AdapterOptions::default()).unwrap();

        assert_eq!(stub.seen_width.load(Ordering::Relaxed), 3);
        assert_eq!(result.alignment.mode, AlignmentMode::Named);
        assert_eq!(result.alignment.expected, 3);
        assert_eq!(result.alignment.zero_filled, vec!["unknown"]);
        assert_eq!(result.grade, RockBurstGrade::Moderate);
        assert_eq!(result.grade_text, "Moderate rock-burst tendency");
        assert_eq!(result.confidence(), 0.6);
    }

    #[test]
    fn test_raw_passthrough_without_names() {
        let stub = StubClassifier::new(None);
        let result = align_and_predict(&sample(), &stub, &AdapterOptions::default()).unwrap();

        assert_eq!(stub.seen_width.load(Ordering::Relaxed), RAW_FEATURE_COUNT);
        assert_eq!(result.alignment.mode, AlignmentMode::RawPassthrough);
        assert_eq!(result.layout, LayoutCheck::Unversioned);
    }

    #[test]
    fn test_passthrough_width_mismatch() {
        let mut stub = StubClassifier::new(None);
        stub.width = Some(98);
        let err = align_and_predict(&sample(), &stub, &AdapterOptions::default()).unwrap_err();
        assert!(matches!(err, AdapterError::FeatureShape { expected: 98, actual: 7 }));
    }

    #[test]
    fn test_class_count_mismatch_not_truncated() {
        let mut stub = StubClassifier::new(None);
        stub.probabilities = vec![0.2, 0.3, 0.4, 0.05, 0.05];
        let err = align_and_predict(&sample(), &stub, &AdapterOptions::default()).unwrap_err();
        assert!(matches!(err, AdapterError::ClassCountMismatch { expected: 4, actual: 5 }));
        assert!(err.is_integrity_violation());

        stub.probabilities = vec![0.5, 0.5, 0.0];
        let err = align_and_predict(&sample(), &stub, &AdapterOptions::default()).unwrap_err();
        assert!(matches!(err, AdapterError::ClassCountMismatch { actual: 3, .. }));
    }

    #[test]
    fn test_label_out_of_range() {
        let mut stub = StubClassifier::new(None);
        stub.label = 4;
        let err = align_and_predict(&sample(), &stub, &AdapterOptions::default()).unwrap_err();
        assert!(matches!(err, AdapterError::LabelOutOfRange(4)));
    }

    #[test]
    fn test_check_outputs() {
        assert!(check_outputs(0, &[0.25; 4]).is_ok());
        assert!(matches!(
            check_outputs(1, &[0.5, 0.5, 0.5, -0.5]),
            Err(AdapterError::InvalidProbabilities(_))
        ));
        assert!(matches!(
            check_outputs(1, &[0.3, 0.3, 0.3, 0.3]),
            Err(AdapterError::InvalidProbabilities(_))
        ));
        assert!(matches!(check_outputs(-1, &[0.25; 4]), Err(AdapterError::LabelOutOfRange(-1))));
    }

    #[test]
    fn test_invalid_input_rejected_before_inference() {
        let stub = StubClassifier::new(None);
        let raw = RawParameters::from_measurements(1.0, f64::NAN, 100.0, 10.0, 0.5);
        let err = align_and_predict(&raw, &stub, &AdapterOptions::default()).unwrap_err();
        assert!(matches!(err, AdapterError::InvalidInput(_)));
        assert_eq!(stub.seen_width.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_zero_sigma_c_when_allowed() {
        let stub = StubClassifier::new(Some(engineering::feature_names()));
        let raw = RawParameters::from_measurements(1.0, 50.0, 0.0, 10.0, 0.5);

        let strict = AdapterOptions::default();
        assert!(matches!(
            align_and_predict(&raw, &stub, &strict),
            Err(AdapterError::InvalidInput(_))
        ));

        let lenient = AdapterOptions { allow_zero_strength: true, ..Default::default() };
        let result = align_and_predict(&raw, &stub, &lenient).unwrap();
        assert!(result.alignment.is_exact());
    }

    #[test]
    fn test_layout_drift() {
        let mut stub = StubClassifier::new(None);
        stub.layout = Some((Some(FEATURE_VERSION + 1), None));

        let result = align_and_predict(&sample(), &stub, &AdapterOptions::default()).unwrap();
        assert!(matches!(result.layout, LayoutCheck::Drifted { .. }));

        let strict = AdapterOptions { strict_layout: true, ..Default::default() };
        let err = align_and_predict(&sample(), &stub, &strict).unwrap_err();
        assert!(matches!(err, AdapterError::LayoutMismatch(_)));
    }

    #[test]
    fn test_exact_layout() {
        let mut stub = StubClassifier::new(Some(engineering::feature_names()));
        stub.layout = Some((Some(FEATURE_VERSION), Some(layout_hash())));

        let strict = AdapterOptions { strict_layout: true, ..Default::default() };
        let result = align_and_predict(&sample(), &stub, &strict).unwrap();
        assert_eq!(result.layout, LayoutCheck::Exact);
        assert!(result.alignment.is_exact());
        assert_eq!(result.alignment.expected, engineering::CATALOG_SIZE);
    }

    #[test]
    fn test_linear_model_end_to_end_is_deterministic() {
        let model = catalog_linear();
        let options = AdapterOptions::default();

        let first = align_and_predict(&sample(), &model, &options).unwrap();
        let second = align_and_predict(&sample(), &model, &options).unwrap();

        assert_eq!(first, second);
        assert!(first.label <= 3);
        assert!((first.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-6);
        assert!(first.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_only_successful_predictions_are_timed() {
        let model = catalog_linear();
        let options = AdapterOptions::default();
        let recorded = std::cell::Cell::new(0);

        let rejected = RawParameters::from_measurements(1.0, 50.0, 100.0, 0.0, 0.5);
        assert!(predict_timed(&rejected, &model, &options, |_| recorded.set(recorded.get() + 1)).is_err());
        assert_eq!(recorded.get(), 0);

        assert!(predict_timed(&sample(), &model, &options, |_| recorded.set(recorded.get() + 1)).is_ok());
        assert_eq!(recorded.get(), 1);
    }

    #[test]
    fn test_predict_without_loaded_model() {
        // The global handle is never initialised by unit tests
        if store::get().is_ok() {
            return;
        }
        let err = predict(&sample(), &AdapterOptions::default()).unwrap_err();
        assert!(matches!(err, AdapterError::ModelNotLoaded));
        assert!(err.is_fatal());
    }
}
