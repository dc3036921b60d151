//! Churn Predictor Library
//!
//! Collects credit card customer attributes through a desktop form, encodes
//! them into the feature row a pre-trained classifier expects, and reports
//! the predicted churn probability.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod types;
pub mod ui;

pub use artifacts::{ArtifactCache, ArtifactLoader, PageImage};
pub use config::AppConfig;
pub use error::{ChurnError, Result};
pub use feature_extractor::{FeatureExtractor, FeatureVector};
pub use models::inference::{predict_churn_probability, InferenceEngine};
pub use types::{customer::FormState, schema::FEATURE_NAMES};
