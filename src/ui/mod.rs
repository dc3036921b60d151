//! egui front end: one sidebar form and one results page.

pub mod form;
pub mod page;

use crate::artifacts::PageImage;
use crate::config::PageConfig;
use crate::error::ChurnError;
use crate::feature_extractor::{FeatureExtractor, FeatureVector};
use crate::models::inference::{ChurnPrediction, InferenceEngine};
use crate::types::customer::FormState;
use eframe::egui;
use std::sync::Arc;
use tracing::debug;

/// Feature row and model outcome of the latest pass.
struct RenderPass {
    vector: FeatureVector,
    outcome: Result<ChurnPrediction, ChurnError>,
}

/// The churn form window.
///
/// Every operator interaction runs the whole form → features → inference →
/// display pass again. Repaints that leave the form untouched (hover, cursor
/// blink) redraw the previous pass without calling the model.
pub struct ChurnApp {
    page: PageConfig,
    image: Arc<PageImage>,
    texture: Option<egui::TextureHandle>,
    extractor: FeatureExtractor,
    engine: InferenceEngine,
    form: FormState,
    last: Option<RenderPass>,
}

impl ChurnApp {
    pub fn new(
        page: PageConfig,
        image: Arc<PageImage>,
        extractor: FeatureExtractor,
        engine: InferenceEngine,
    ) -> Self {
        Self {
            page,
            image,
            texture: None,
            extractor,
            engine,
            form: FormState::default(),
            last: None,
        }
    }

    /// Rebuild the feature row and re-run inference if the form moved.
    fn refresh(&mut self, changed: bool) {
        let vector = self.extractor.build(&self.form);
        let stale = changed
            || self
                .last
                .as_ref()
                .map_or(true, |pass| pass.vector != vector);
        if !stale {
            return;
        }

        self.engine.metrics().record_render_pass();
        debug!(model = %self.engine.model_name(), form = ?self.form, "Render pass");
        let outcome = self.engine.predict(&vector);
        self.last = Some(RenderPass { vector, outcome });
    }
}

impl eframe::App for ChurnApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut changed = false;
        egui::SidePanel::left("customer_inputs")
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Customer inputs");
                ui.add_space(8.0);
                egui::ScrollArea::vertical().show(ui, |ui| {
                    changed = form::show_form(ui, &mut self.form);
                });
            });

        self.refresh(changed);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                page::show_heading(ui);
                page::show_image(ui, &mut self.texture, &self.image, self.page.image_width);
                if let Some(pass) = &self.last {
                    page::show_feature_table(ui, &pass.vector);
                    page::show_prediction(ui, &pass.outcome);
                }
            });
        });
    }
}

/// Minimal fallback app to display startup errors.
pub struct LaunchError {
    message: String,
}

impl LaunchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start");
                ui.colored_label(ui.visuals().error_fg_color, &self.message);
            });
        });
    }
}
