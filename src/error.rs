//! Error taxonomy for the churn prediction flow.

use std::path::{Path, PathBuf};

/// Failures surfaced by artifact loading, encoding and inference.
///
/// None of these are retried: a load failure aborts startup, an inference
/// failure aborts the current render pass.
#[derive(Debug, thiserror::Error)]
pub enum ChurnError {
    /// Artifact file is missing, unreadable or cannot be decoded into the
    /// expected artifact type.
    #[error("Failed to load artifact {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// The classifier rejected the feature row or produced an unusable output.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// A label outside the fixed option set was supplied for a categorical field.
    #[error("Unknown {field} label: {label:?}")]
    UnknownLabel { field: &'static str, label: String },
}

impl ChurnError {
    pub fn load(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn inference(reason: impl ToString) -> Self {
        Self::Inference(reason.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChurnError>;
