use crate::error::Result;
use crate::types::schema::FEATURE_COUNT;

/// A trained binary churn classifier.
///
/// Implementations are read-only once loaded and may be shared between
/// threads. Class 0 is "stays", class 1 is "churned".
pub trait ChurnClassifier: Send + Sync {
    /// Predict `[P(stays), P(churned)]` for a single feature row in schema order.
    fn predict_proba(&self, row: &[f32; FEATURE_COUNT]) -> Result<[f64; 2]>;

    /// Human readable name for logs
    fn name(&self) -> &str {
        "classifier"
    }
}
