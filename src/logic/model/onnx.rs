//! ONNX Runtime Backend
//!
//! Runs a converted binary classifier. Expected graph:
//! - one float32 input of shape `[1, n_features]`; a static
//!   `n_features` is checked against the deployed schema at load
//! - an int64 label output
//! - a float32 probability output of shape `[1, 2]` (zipmap disabled)

use std::path::Path;

use ndarray::Array2;
use parking_lot::Mutex;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;

use super::classifier::{check_width, HazardClassifier, HazardLabel};
use crate::error::{HazardError, Result};
use crate::logic::features::FeatureVector;

const LABEL_OUTPUTS: &[&str] = &["label", "output_label"];
const PROBA_OUTPUTS: &[&str] = &["probabilities", "output_probability"];

pub struct OnnxClassifier {
    /// `Session::run` needs `&mut`; the lock keeps the handle shareable
    session: Mutex<Session>,
    label_output: String,
    proba_output: String,
    n_features: Option<usize>,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("label_output", &self.label_output)
            .field("proba_output", &self.proba_output)
            .field("n_features", &self.n_features)
            .finish()
    }
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn from_file(model_path: &Path, declared_width: Option<usize>) -> Result<Self> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(HazardError::artifact(format!("Model not found: {}", model_path.display())));
        }

        let session = Session::builder()
            .map_err(|e| HazardError::artifact(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| HazardError::artifact(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| HazardError::artifact(format!("Failed to load model: {}", e)))?;

        Self::from_session(session, declared_width)
    }

    fn from_session(session: Session, declared_width: Option<usize>) -> Result<Self> {
        let names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let (label_output, proba_output) = resolve_outputs(&names)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| HazardError::artifact("classifier graph has no inputs"))?;
        let graph_width = input.input_type.tensor_shape().and_then(|shape| input_width(shape));
        let n_features = reconcile_width(graph_width, declared_width)?;

        log::info!(
            "ONNX classifier ready (input: '{}' x {:?}, label: '{}', probabilities: '{}')",
            input.name,
            n_features,
            label_output,
            proba_output
        );

        Ok(Self {
            session: Mutex::new(session),
            label_output,
            proba_output,
            n_features,
        })
    }

    fn run(&self, vector: &FeatureVector) -> Result<(HazardLabel, [f64; 2])> {
        check_width(self, vector)?;

        let input_array = Array2::<f32>::from_shape_vec((1, vector.len()), vector.as_slice().to_vec())
            .map_err(|e| HazardError::inference(format!("Array error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| HazardError::inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| HazardError::inference(format!("Inference failed: {}", e)))?;

        let label_value = outputs
            .get(&self.label_output)
            .ok_or_else(|| HazardError::inference("No label output"))?;
        let (_, labels) = label_value
            .try_extract_tensor::<i64>()
            .map_err(|e| HazardError::inference(format!("Label extract error: {}", e)))?;

        let proba_value = outputs
            .get(&self.proba_output)
            .ok_or_else(|| HazardError::inference("No probability output"))?;
        let (_, proba) = proba_value
            .try_extract_tensor::<f32>()
            .map_err(|e| HazardError::inference(format!("Probability extract error: {}", e)))?;

        decode_outputs(labels, proba)
    }
}

/// Static width of a `[batch, n_features]` input; `None` when dynamic
fn input_width(dims: &[i64]) -> Option<usize> {
    dims.last()
        .copied()
        .filter(|&d| d > 0)
        .and_then(|d| usize::try_from(d).ok())
}

/// The graph's own input width wins; a sidecar may only confirm it
fn reconcile_width(graph: Option<usize>, declared: Option<usize>) -> Result<Option<usize>> {
    match (graph, declared) {
        (Some(graph), Some(declared)) if graph != declared => Err(HazardError::SchemaMismatch(format!(
            "graph input has {} features, metadata declares {}",
            graph, declared
        ))),
        (Some(graph), _) => Ok(Some(graph)),
        (None, declared) => Ok(declared),
    }
}

/// First label plus the `[safe, hazardous]` row of a single-sample run
fn decode_outputs(labels: &[i64], proba: &[f32]) -> Result<(HazardLabel, [f64; 2])> {
    let label = labels
        .first()
        .copied()
        .ok_or_else(|| HazardError::inference("Empty label output"))?;

    if proba.len() != 2 {
        return Err(HazardError::inference(format!(
            "Expected 2 class probabilities, got {}",
            proba.len()
        )));
    }

    Ok((
        HazardLabel::try_from(label)?,
        [f64::from(proba[0]), f64::from(proba[1])],
    ))
}

/// Pick label and probability outputs by conventional name, else by position
fn resolve_outputs(names: &[String]) -> Result<(String, String)> {
    let find = |candidates: &[&str]| {
        names
            .iter()
            .find(|n| candidates.contains(&n.as_str()))
            .cloned()
    };

    match (find(LABEL_OUTPUTS), find(PROBA_OUTPUTS)) {
        (Some(label), Some(proba)) => Ok((label, proba)),
        _ if names.len() >= 2 => Ok((names[0].clone(), names[1].clone())),
        _ => Err(HazardError::artifact(format!(
            "classifier graph needs label and probability outputs, found {:?}",
            names
        ))),
    }
}

impl HazardClassifier for OnnxClassifier {
    fn predict(&self, vector: &FeatureVector) -> Result<HazardLabel> {
        self.run(vector).map(|(label, _)| label)
    }

    fn predict_proba(&self, vector: &FeatureVector) -> Result<[f64; 2]> {
        self.run(vector).map(|(_, proba)| proba)
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }

    fn infer(&self, vector: &FeatureVector) -> Result<(HazardLabel, [f64; 2])> {
        self.run(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_outputs_by_name() {
        let (label, proba) =
            resolve_outputs(&names(&["output_probability", "output_label"])).unwrap();
        assert_eq!(label, "output_label");
        assert_eq!(proba, "output_probability");
    }

    #[test]
    fn test_resolve_outputs_by_position() {
        let (label, proba) = resolve_outputs(&names(&["y", "p"])).unwrap();
        assert_eq!(label, "y");
        assert_eq!(proba, "p");
    }

    #[test]
    fn test_resolve_outputs_single_output() {
        assert!(matches!(
            resolve_outputs(&names(&["score"])),
            Err(HazardError::ArtifactLoad(_))
        ));
    }

    #[test]
    fn test_input_width() {
        assert_eq!(input_width(&[1, 10]), Some(10));
        assert_eq!(input_width(&[-1, 6]), Some(6));
        assert_eq!(input_width(&[1, -1]), None);
        assert_eq!(input_width(&[]), None);
    }

    #[test]
    fn test_reconcile_width() {
        assert_eq!(reconcile_width(Some(10), None).unwrap(), Some(10));
        assert_eq!(reconcile_width(Some(6), Some(6)).unwrap(), Some(6));
        assert_eq!(reconcile_width(None, Some(6)).unwrap(), Some(6));
        assert_eq!(reconcile_width(None, None).unwrap(), None);
        assert!(matches!(
            reconcile_width(Some(6), Some(10)),
            Err(HazardError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_decode_outputs() {
        let (label, proba) = decode_outputs(&[1], &[0.25, 0.75]).unwrap();
        assert_eq!(label, HazardLabel::Hazardous);
        assert_eq!(proba, [0.25, 0.75]);

        let (label, _) = decode_outputs(&[0, 1], &[0.9, 0.1]).unwrap();
        assert_eq!(label, HazardLabel::Safe);
    }

    #[test]
    fn test_decode_outputs_rejects_bad_shapes() {
        assert!(matches!(decode_outputs(&[], &[0.5, 0.5]), Err(HazardError::Inference(_))));
        assert!(matches!(decode_outputs(&[1], &[1.0]), Err(HazardError::Inference(_))));
        assert!(matches!(
            decode_outputs(&[0], &[0.2, 0.3, 0.5]),
            Err(HazardError::Inference(_))
        ));
        assert!(matches!(decode_outputs(&[2], &[0.5, 0.5]), Err(HazardError::Inference(_))));
    }

    #[test]
    fn test_missing_file_is_artifact_error() {
        let result = OnnxClassifier::from_file(Path::new("does/not/exist.onnx"), Some(6));
        assert!(matches!(result, Err(HazardError::ArtifactLoad(_))));
    }
}
