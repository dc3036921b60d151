//! Churn Predictor - Main Entry Point
//!
//! Loads the page image and churn model, then opens the form window.

use anyhow::Result;
use churn_predictor::{
    artifacts::ArtifactLoader,
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    feature_extractor::FeatureExtractor,
    logging,
    metrics::RenderMetrics,
    models::{inference::InferenceEngine, loader::ModelLoader, ChurnClassifier},
    ui::{ChurnApp, LaunchError},
};
use eframe::egui;
use std::sync::Arc;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let (config, config_status) = match AppConfig::load_or_default(DEFAULT_CONFIG_PATH) {
        Ok((config, from_file)) => (config, Ok(from_file)),
        Err(e) => (AppConfig::default(), Err(e)),
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Logging disabled: {e:#}");
    }

    info!("Starting Churn Predictor");
    match &config_status {
        Ok(true) => info!("Configuration loaded from {DEFAULT_CONFIG_PATH}"),
        Ok(false) => warn!("{DEFAULT_CONFIG_PATH} not found, using built-in defaults"),
        Err(e) => error!(error = %format!("{e:#}"), "Configuration failed"),
    }

    let metrics = Arc::new(RenderMetrics::new());
    let loader =
        ArtifactLoader::init_global(ModelLoader::with_threads(config.inference.onnx_threads));

    // Startup failures halt on an error page instead of the form
    let app: Box<dyn eframe::App> = match config_status {
        Err(e) => Box::new(LaunchError::new(format!("{e:#}"))),
        Ok(_) => match build_app(&config, loader, metrics.clone()) {
            Ok(app) => Box::new(app),
            Err(e) => {
                error!(error = %e, "Startup failed");
                Box::new(LaunchError::new(e.to_string()))
            }
        },
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.page.title.clone())
            .with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    let outcome = eframe::run_native(
        &config.page.title,
        native_options,
        Box::new(move |_cc| Ok(app)),
    );

    info!("Churn Predictor shutting down...");
    metrics.print_summary();

    outcome.map_err(|e| anyhow::anyhow!("UI event loop failed: {e}"))
}

/// Load both artifacts and wire up the inference engine.
fn build_app(
    config: &AppConfig,
    loader: &ArtifactLoader,
    metrics: Arc<RenderMetrics>,
) -> churn_predictor::Result<ChurnApp> {
    let image = loader.load_image(&config.artifacts.image_path)?;
    let model = loader.load_model(&config.artifacts.model_path)?;
    info!(
        model = %model.name(),
        input = %model.input_name(),
        output = %model.output_name(),
        "Churn model ready"
    );

    let extractor = FeatureExtractor::new();
    info!("Feature extractor initialized ({} features)", extractor.feature_count());

    let engine = InferenceEngine::new(model, metrics);
    Ok(ChurnApp::new(config.page.clone(), image, extractor, engine))
}
