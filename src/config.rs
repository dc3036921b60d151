//! Configuration management for the churn predictor

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Paths of the artifacts loaded at startup
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Image shown at the top of the page
    pub image_path: String,
    /// ONNX export of the churn classifier
    pub model_path: String,
}

/// Page presentation settings
#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    /// Window title
    #[serde(default = "default_title")]
    pub title: String,
    /// Display width of the page image in points
    #[serde(default = "default_image_width")]
    pub image_width: f32,
}

/// ONNX Runtime settings
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Intra-op threads for the model session (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_title() -> String {
    "Churn app".to_string()
}

fn default_image_width() -> f32 {
    600.0
}

fn default_onnx_threads() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            image_width: default_image_width(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            onnx_threads: default_onnx_threads(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load configuration from `path`, or the built-in defaults when the file
    /// does not exist. A file that exists but fails to parse is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        if path.as_ref().exists() {
            Ok((Self::load_from_path(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactsConfig {
                image_path: "main_page_image.jpg".to_string(),
                model_path: "cat_model.onnx".to_string(),
            },
            page: PageConfig::default(),
            inference: InferenceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
