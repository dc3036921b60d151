//! ML model loading and inference

pub mod classifier;
pub mod inference;
pub mod loader;
pub mod onnx;

pub use classifier::ChurnClassifier;
pub use inference::{predict_churn_probability, ChurnPrediction, InferenceEngine};
pub use loader::ModelLoader;
pub use onnx::OnnxClassifier;
