//! ONNX model loader

use crate::error::{ChurnError, Result};
use crate::models::onnx::OnnxClassifier;
use crate::types::schema::FEATURE_COUNT;
use anyhow::Context;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::info;

static ORT_INITIALIZED: Mutex<bool> = Mutex::new(false);

/// Initialize ONNX Runtime once per process.
fn init_runtime() -> std::result::Result<(), String> {
    init_once(&ORT_INITIALIZED, || {
        ort::init().commit().map_err(|e| e.to_string())?;
        info!("ONNX Runtime initialized");
        Ok(())
    })
}

/// Run `init` until it succeeds once; a failure is retried on the next call.
fn init_once<F>(initialized: &Mutex<bool>, init: F) -> std::result::Result<(), String>
where
    F: FnOnce() -> std::result::Result<(), String>,
{
    let mut done = initialized.lock().unwrap_or_else(PoisonError::into_inner);
    if !*done {
        init()?;
        *done = true;
    }
    Ok(())
}

/// Loader for ONNX churn models
#[derive(Debug, Clone)]
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    pub fn onnx_threads(&self) -> usize {
        self.onnx_threads
    }

    /// Load an ONNX churn model and verify it accepts a 13-column row.
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<OnnxClassifier> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("model")
            .to_string();

        if !path.is_file() {
            return Err(ChurnError::load(path, "model file not found"));
        }

        init_runtime().map_err(|e| ChurnError::load(path, format!("ONNX Runtime unavailable: {e}")))?;

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = self
            .build_session(path)
            .map_err(|e| ChurnError::load(path, format!("{e:#}")))?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| ChurnError::load(path, "model declares no inputs"))?;
        let input_dims: Option<Vec<i64>> = input
            .input_type
            .tensor_shape()
            .map(|shape| shape.iter().copied().collect());
        check_input_shape(input_dims.as_deref()).map_err(|reason| ChurnError::load(path, reason))?;
        let input_name = input.name.clone();

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| ChurnError::load(path, "model declares no outputs"))?;

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(OnnxClassifier::new(name, session, input_name, output_name))
    }

    fn build_session(&self, path: &Path) -> anyhow::Result<Session> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context("Failed to deserialize ONNX model")?;
        Ok(session)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the first model input against the feature schema width.
///
/// The last dimension must be dynamic (negative) or exactly [`FEATURE_COUNT`].
pub(crate) fn check_input_shape(dims: Option<&[i64]>) -> std::result::Result<(), String> {
    let dims = dims.ok_or_else(|| "first model input is not a tensor".to_string())?;
    match dims.last() {
        None => Err("first model input is a scalar, expected a feature row".to_string()),
        Some(&width) if width < 0 || width == FEATURE_COUNT as i64 => Ok(()),
        Some(_) => Err(format!(
            "model expects input shape {dims:?}, feature row has {FEATURE_COUNT} columns"
        )),
    }
}
