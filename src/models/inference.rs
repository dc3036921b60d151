//! Churn probability inference

use crate::error::{ChurnError, Result};
use crate::feature_extractor::FeatureVector;
use crate::metrics::RenderMetrics;
use crate::models::classifier::ChurnClassifier;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Result of one inference call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChurnPrediction {
    /// Probability of the positive ("churned") class, in [0, 1]
    pub probability: f64,
}

impl ChurnPrediction {
    /// Probability formatted to two decimals for display
    pub fn formatted(&self) -> String {
        format_probability(self.probability)
    }
}

pub fn format_probability(probability: f64) -> String {
    format!("{probability:.2}")
}

/// Select the churn probability from a two-class output.
///
/// Fails when the classifier returned something that is not a probability;
/// a fabricated fallback score is never substituted.
pub fn predict_churn_probability(
    classifier: &dyn ChurnClassifier,
    vector: &FeatureVector,
) -> Result<f64> {
    let probabilities = classifier.predict_proba(&vector.to_model_row())?;
    let churn = probabilities[1];

    if !churn.is_finite() || !(0.0..=1.0).contains(&churn) {
        return Err(ChurnError::inference(format!(
            "{} returned churn probability {churn} outside [0, 1]",
            classifier.name()
        )));
    }

    Ok(churn)
}

/// Runs the churn classifier for each render pass and records timings.
pub struct InferenceEngine {
    classifier: Arc<dyn ChurnClassifier>,
    metrics: Arc<RenderMetrics>,
}

impl InferenceEngine {
    pub fn new(classifier: Arc<dyn ChurnClassifier>, metrics: Arc<RenderMetrics>) -> Self {
        Self { classifier, metrics }
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn metrics(&self) -> &Arc<RenderMetrics> {
        &self.metrics
    }

    /// Run inference on one feature vector.
    pub fn predict(&self, vector: &FeatureVector) -> Result<ChurnPrediction> {
        let start = Instant::now();
        match predict_churn_probability(self.classifier.as_ref(), vector) {
            Ok(probability) => {
                let elapsed = start.elapsed();
                self.metrics.record_prediction(elapsed, probability);
                debug!(
                    model = %self.classifier.name(),
                    probability = probability,
                    elapsed_us = elapsed.as_micros() as u64,
                    "Churn inference complete"
                );
                Ok(ChurnPrediction { probability })
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(model = %self.classifier.name(), error = %e, "Churn inference failed");
                Err(e)
            }
        }
    }
}
