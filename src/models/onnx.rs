//! ONNX Runtime backed churn classifier

use crate::error::{ChurnError, Result};
use crate::models::classifier::ChurnClassifier;
use crate::types::schema::FEATURE_COUNT;
use ort::memory::Allocator;
use ort::session::{Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// Classifier executed by an ONNX Runtime session.
#[derive(Debug)]
pub struct OnnxClassifier {
    /// Model name
    name: String,
    /// ONNX Runtime session; `run` needs exclusive access
    session: Mutex<Session>,
    /// Input name for the feature row
    input_name: String,
    /// Output name for probabilities
    output_name: String,
}

impl OnnxClassifier {
    pub(crate) fn new(name: String, session: Session, input_name: String, output_name: String) -> Self {
        Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
        }
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }
}

impl ChurnClassifier for OnnxClassifier {
    fn predict_proba(&self, row: &[f32; FEATURE_COUNT]) -> Result<[f64; 2]> {
        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, FEATURE_COUNT as i64];
        let input_tensor = Tensor::from_array((shape, row.to_vec()))
            .map_err(|e| ChurnError::inference(format!("failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ChurnError::inference(format!("session lock error: {e}")))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| ChurnError::inference(format!("{} rejected the input row: {e}", self.name)))?;

        extract_probabilities(&outputs, &self.output_name, &self.name)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Extract class probabilities from the session outputs.
///
/// Handles both tensor outputs (XGBoost, Random Forest) and seq(map) outputs
/// (CatBoost, LightGBM).
fn extract_probabilities(
    outputs: &SessionOutputs,
    output_name: &str,
    model_name: &str,
) -> Result<[f64; 2]> {
    if let Some(output) = outputs.get(output_name) {
        if let Some(probs) = extract_from_value(&output, model_name)? {
            return Ok(probs);
        }
    }

    // Fallback: first non-label output that yields probabilities
    for (name, output) in outputs.iter() {
        if name.contains("label") {
            continue;
        }
        if let Some(probs) = extract_from_value(&output, model_name)? {
            debug!(model = %model_name, output = %name, "Extracted probabilities (fallback output)");
            return Ok(probs);
        }
    }

    Err(ChurnError::inference(format!(
        "{model_name} produced no probability output"
    )))
}

fn extract_from_value(output: &DynValue, model_name: &str) -> Result<Option<[f64; 2]>> {
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        let probs = probabilities_from_tensor(&dims, data)?;
        debug!(model = %model_name, churn = probs[1], "Extracted from tensor");
        return Ok(Some(probs));
    }

    if DynSequenceValueType::can_downcast(&output.dtype()) {
        let probs = extract_from_sequence_map(output)?;
        debug!(model = %model_name, churn = probs[1], "Extracted from seq(map)");
        return Ok(Some(probs));
    }

    Ok(None)
}

/// Extract probabilities from seq(map(int64, float)) format
fn extract_from_sequence_map(output: &DynValue) -> Result<[f64; 2]> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| ChurnError::inference(format!("failed to downcast to sequence: {e}")))?;

    let maps = sequence
        .try_extract_sequence::<DynMapValueType>(&allocator)
        .map_err(|e| ChurnError::inference(format!("failed to read sequence: {e}")))?;

    // batch_size is always 1
    let map_value = maps
        .first()
        .ok_or_else(|| ChurnError::inference("empty probability sequence"))?;

    let kv_pairs = map_value
        .try_extract_key_values::<i64, f32>()
        .map_err(|e| ChurnError::inference(format!("failed to read probability map: {e}")))?;

    probabilities_from_class_map(&kv_pairs)
}

/// Interpret a probability tensor of shape `[1, 2]`, `[2]`, `[1, 1]` or `[1]`.
pub(crate) fn probabilities_from_tensor(dims: &[i64], data: &[f32]) -> Result<[f64; 2]> {
    let classes = match dims {
        [1, classes] | [classes] => *classes,
        _ => {
            return Err(ChurnError::inference(format!(
                "unexpected probability tensor shape {dims:?}"
            )))
        }
    };

    match (classes, data) {
        (2, [stays, churned, ..]) => Ok([f64::from(*stays), f64::from(*churned)]),
        (1, [churned, ..]) => Ok([1.0 - f64::from(*churned), f64::from(*churned)]),
        _ => Err(ChurnError::inference(format!(
            "expected a two-class probability tensor, got shape {dims:?}"
        ))),
    }
}

/// Interpret `(class_id, probability)` pairs from a seq(map) output.
pub(crate) fn probabilities_from_class_map(pairs: &[(i64, f32)]) -> Result<[f64; 2]> {
    let lookup = |class: i64| {
        pairs
            .iter()
            .find(|(id, _)| *id == class)
            .map(|(_, p)| f64::from(*p))
    };

    match (lookup(0), lookup(1)) {
        (Some(stays), Some(churned)) => Ok([stays, churned]),
        (None, Some(churned)) => Ok([1.0 - churned, churned]),
        (Some(stays), None) => Ok([stays, 1.0 - stays]),
        (None, None) => Err(ChurnError::inference("no class probabilities in output map")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_class_tensor() {
        let probs = probabilities_from_tensor(&[1, 2], &[0.25, 0.75]).unwrap();
        assert_eq!(probs, [0.25, 0.75]);

        let probs = probabilities_from_tensor(&[2], &[0.5, 0.5]).unwrap();
        assert_eq!(probs, [0.5, 0.5]);
    }

    #[test]
    fn test_single_probability_tensor() {
        let probs = probabilities_from_tensor(&[1, 1], &[0.25]).unwrap();
        assert_eq!(probs, [0.75, 0.25]);
    }

    #[test]
    fn test_unexpected_tensor_shape() {
        assert!(probabilities_from_tensor(&[1, 3], &[0.2, 0.3, 0.5]).is_err());
        assert!(probabilities_from_tensor(&[2, 2], &[0.2, 0.8, 0.4, 0.6]).is_err());
        assert!(probabilities_from_tensor(&[1, 2], &[0.2]).is_err());
    }

    #[test]
    fn test_class_map() {
        let probs = probabilities_from_class_map(&[(0, 0.125), (1, 0.875)]).unwrap();
        assert_eq!(probs, [0.125, 0.875]);

        let probs = probabilities_from_class_map(&[(1, 0.25)]).unwrap();
        assert_eq!(probs, [0.75, 0.25]);

        assert!(probabilities_from_class_map(&[(7, 1.0)]).is_err());
    }
}
