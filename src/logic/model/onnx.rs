//! ONNX Classifier - ONNX Runtime Integration
//!
//! Expects a classifier graph with one float input `[1, N]`, an int64 label
//! output and a float probability output `[1, C]` (exported without zipmap).
//! Output names come from metadata, else the first and second graph outputs.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::tensor::TensorElementType;
use ort::value::{Value, ValueType};
use parking_lot::Mutex;

use super::classifier::{Classifier, ModelKind};
use super::metadata::ModelMetadata;
use crate::logic::error::{AdapterError, AdapterResult};

pub struct OnnxClassifier {
    /// Running a session needs exclusive access
    session: Mutex<Session>,
    label_output: String,
    probability_output: String,
    feature_names: Option<Vec<String>>,
    /// Static input width declared by the graph
    input_width: Option<usize>,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load(model_path: &Path, metadata: &ModelMetadata) -> AdapterResult<Self> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| AdapterError::ModelLoad(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| AdapterError::ModelLoad(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| AdapterError::ModelLoad(format!("Failed to load model: {}", e)))?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| AdapterError::ModelLoad("Model defines no inputs".to_string()))?;
        let input_width = declared_width(&input.input_type);

        if let (Some(names), Some(width)) = (&metadata.feature_names, input_width) {
            if names.len() != width {
                return Err(AdapterError::Metadata(format!(
                    "{} feature names for a graph input of width {}",
                    names.len(),
                    width
                )));
            }
        }

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let (label_output, probability_output) = select_outputs(&output_names, metadata)?;

        for output in &session.outputs {
            if output.name == label_output {
                check_output_type(&output.name, &output.output_type, TensorElementType::Int64)?;
            } else if output.name == probability_output {
                check_output_type(&output.name, &output.output_type, TensorElementType::Float32)?;
            }
        }

        log::info!(
            "ONNX model loaded successfully (input width: {}, label: {}, probabilities: {})",
            input_width.map(|w| w.to_string()).unwrap_or_else(|| "dynamic".to_string()),
            label_output,
            probability_output
        );

        Ok(Self {
            session: Mutex::new(session),
            label_output,
            probability_output,
            feature_names: metadata.feature_names.clone(),
            input_width,
        })
    }

    fn run(&self, row: &[f64]) -> AdapterResult<(i64, Vec<f64>)> {
        if let Some(expected) = self.n_features() {
            if row.len() != expected {
                return Err(AdapterError::FeatureShape { expected, actual: row.len() });
            }
        }

        let input_array = Array2::<f32>::from_shape_vec(
            (1, row.len()),
            row.iter().map(|&v| v as f32).collect(),
        )
        .map_err(|e| AdapterError::Inference(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| AdapterError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| AdapterError::Inference(format!("Inference failed: {}", e)))?;

        let label_value = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| AdapterError::Inference(format!("No output '{}'", self.label_output)))?;
        let (_, labels) = label_value
            .try_extract_tensor::<i64>()
            .map_err(|e| AdapterError::Inference(format!("Label extract error: {}", e)))?;
        let label = read_label(labels)?;

        let proba_value = outputs
            .get(self.probability_output.as_str())
            .ok_or_else(|| AdapterError::Inference(format!("No output '{}'", self.probability_output)))?;
        let (shape, probabilities) = proba_value
            .try_extract_tensor::<f32>()
            .map_err(|e| AdapterError::Inference(format!("Probability extract error: {}", e)))?;

        Ok((label, read_probabilities(shape, probabilities)?))
    }
}

// ============================================================================
// GRAPH CONTRACT
// ============================================================================

/// Last dimension of a rank-2 tensor input, when the graph fixes it
fn declared_width(input_type: &ValueType) -> Option<usize> {
    let shape = input_type.tensor_shape()?;
    match shape.last() {
        Some(&width) if shape.len() == 2 && width > 0 => Some(width as usize),
        _ => None,
    }
}

/// (label output, probability output), from metadata or graph order
fn select_outputs(output_names: &[String], metadata: &ModelMetadata) -> AdapterResult<(String, String)> {
    let label_output = match &metadata.label_output {
        Some(name) => name.clone(),
        None => output_names
            .first()
            .cloned()
            .ok_or_else(|| AdapterError::ModelLoad("Model defines no outputs".to_string()))?,
    };
    let probability_output = match &metadata.probability_output {
        Some(name) => name.clone(),
        None => output_names.get(1).cloned().ok_or_else(|| {
            AdapterError::ModelLoad("Classifier must expose label and probability outputs".to_string())
        })?,
    };

    for name in [&label_output, &probability_output] {
        if !output_names.contains(name) {
            return Err(AdapterError::ModelLoad(format!(
                "Output '{}' not found (model outputs: {:?})",
                name, output_names
            )));
        }
    }

    if label_output == probability_output {
        return Err(AdapterError::ModelLoad(format!(
            "Label and probability outputs are both '{}'",
            label_output
        )));
    }

    Ok((label_output, probability_output))
}

/// Map-typed outputs (zipmap) and wrong element types are rejected at load
fn check_output_type(name: &str, output_type: &ValueType, expected: TensorElementType) -> AdapterResult<()> {
    if output_type.tensor_type() == Some(expected) {
        return Ok(());
    }
    Err(AdapterError::ModelLoad(format!(
        "Output '{}' must be a {:?} tensor, got {:?} (export with zipmap disabled)",
        name, expected, output_type
    )))
}

fn read_label(labels: &[i64]) -> AdapterResult<i64> {
    match labels {
        [label] => Ok(*label),
        [] => Err(AdapterError::Inference("Empty label output".to_string())),
        _ => Err(AdapterError::Inference(format!(
            "Expected one label for one row, got {}",
            labels.len()
        ))),
    }
}

/// `[1, C]` probabilities widened to f64
fn read_probabilities(shape: &[i64], values: &[f32]) -> AdapterResult<Vec<f64>> {
    if shape.len() != 2 || shape[0] != 1 {
        return Err(AdapterError::Inference(format!(
            "Expected probability tensor [1, C], got {:?}",
            shape
        )));
    }
    Ok(values.iter().map(|&p| p as f64).collect())
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> ModelKind {
        ModelKind::Onnx
    }

    fn predict(&self, row: &[f64]) -> AdapterResult<i64> {
        self.run(row).map(|(label, _)| label)
    }

    fn predict_proba(&self, row: &[f64]) -> AdapterResult<Vec<f64>> {
        self.run(row).map(|(_, probabilities)| probabilities)
    }

    fn classify(&self, row: &[f64]) -> AdapterResult<(i64, Vec<f64>)> {
        self.run(row)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn n_features(&self) -> Option<usize> {
        self.feature_names
            .as_ref()
            .map(Vec::len)
            .or(self.input_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ort::tensor::{Shape, SymbolicDimensions};

    fn tensor(ty: TensorElementType, dims: &[i64]) -> ValueType {
        ValueType::Tensor {
            ty,
            shape: Shape::new(dims.iter().copied()),
            dimension_symbols: SymbolicDimensions::empty(dims.len()),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxClassifier::load(&dir.path().join("missing.onnx"), &ModelMetadata::default());
        assert!(matches!(result, Err(AdapterError::ModelLoad(_))));
    }

    #[test]
    fn test_declared_width() {
        assert_eq!(declared_width(&tensor(TensorElementType::Float32, &[-1, 98])), Some(98));
        assert_eq!(declared_width(&tensor(TensorElementType::Float32, &[1, 7])), Some(7));
        // Dynamic feature axis
        assert_eq!(declared_width(&tensor(TensorElementType::Float32, &[-1, -1])), None);
        assert_eq!(declared_width(&tensor(TensorElementType::Float32, &[98])), None);

        let map = ValueType::Map { key: TensorElementType::Int64, value: TensorElementType::Float32 };
        assert_eq!(declared_width(&map), None);
    }

    #[test]
    fn test_select_outputs_defaults_to_graph_order() {
        let outputs = names(&["output_label", "output_probability"]);
        let (label, proba) = select_outputs(&outputs, &ModelMetadata::default()).unwrap();
        assert_eq!(label, "output_label");
        assert_eq!(proba, "output_probability");
    }

    #[test]
    fn test_select_outputs_from_metadata() {
        let outputs = names(&["probabilities", "label"]);
        let metadata = ModelMetadata {
            label_output: Some("label".into()),
            probability_output: Some("probabilities".into()),
            ..Default::default()
        };
        let (label, proba) = select_outputs(&outputs, &metadata).unwrap();
        assert_eq!(label, "label");
        assert_eq!(proba, "probabilities");

        let renamed = ModelMetadata { label_output: Some("class".into()), ..metadata.clone() };
        assert!(matches!(select_outputs(&outputs, &renamed), Err(AdapterError::ModelLoad(_))));

        let same = ModelMetadata { label_output: Some("probabilities".into()), ..metadata };
        assert!(matches!(select_outputs(&outputs, &same), Err(AdapterError::ModelLoad(_))));
    }

    #[test]
    fn test_select_outputs_needs_two_outputs() {
        let err = select_outputs(&names(&["label"]), &ModelMetadata::default()).unwrap_err();
        assert!(matches!(err, AdapterError::ModelLoad(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_zipmap_output_rejected() {
        let zipmap = ValueType::Sequence(Box::new(ValueType::Map {
            key: TensorElementType::Int64,
            value: TensorElementType::Float32,
        }));
        let err = check_output_type("output_probability", &zipmap, TensorElementType::Float32).unwrap_err();
        assert!(matches!(err, AdapterError::ModelLoad(_)));
        assert!(err.to_string().contains("zipmap"));

        assert!(check_output_type("p", &tensor(TensorElementType::Float32, &[-1, 4]), TensorElementType::Float32).is_ok());
        assert!(check_output_type("l", &tensor(TensorElementType::Int64, &[-1]), TensorElementType::Int64).is_ok());
        // String labels from a classifier exported with string classes
        assert!(check_output_type("l", &tensor(TensorElementType::String, &[-1]), TensorElementType::Int64).is_err());
    }

    #[test]
    fn test_read_label() {
        assert_eq!(read_label(&[2]).unwrap(), 2);
        assert!(matches!(read_label(&[]), Err(AdapterError::Inference(_))));
        assert!(matches!(read_label(&[1, 2]), Err(AdapterError::Inference(_))));
    }

    #[test]
    fn test_read_probabilities() {
        let probabilities = read_probabilities(&[1, 4], &[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(probabilities.len(), 4);
        assert!((probabilities[3] - 0.4).abs() < 1e-6);

        // Class count is checked by the adapter, not here
        assert_eq!(read_probabilities(&[1, 3], &[0.2, 0.3, 0.5]).unwrap().len(), 3);

        assert!(read_probabilities(&[2, 4], &[0.25; 8]).is_err());
        assert!(read_probabilities(&[4], &[0.25; 4]).is_err());
    }
}
