//! Central page: heading, illustration, feature table and prediction.

use crate::artifacts::PageImage;
use crate::error::ChurnError;
use crate::feature_extractor::FeatureVector;
use crate::models::inference::ChurnPrediction;
use eframe::egui::{self, RichText, TextureHandle, TextureOptions};

pub fn show_heading(ui: &mut egui::Ui) {
    ui.heading("Credit card customer churn diagnostics");
    ui.label("Enter the customer's data in the sidebar to get a prediction.");
    ui.add_space(8.0);
}

/// Upload the page image once and draw it at `width` points.
pub fn show_image(
    ui: &mut egui::Ui,
    texture: &mut Option<TextureHandle>,
    image: &PageImage,
    width: f32,
) {
    let tex = texture.get_or_insert_with(|| {
        let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size(), &image.rgba);
        ui.ctx()
            .load_texture("page_image", color_image, TextureOptions::LINEAR)
    });

    let [w, h] = tex.size();
    if w == 0 || h == 0 {
        return;
    }
    let size = egui::vec2(width, width * h as f32 / w as f32);
    ui.image((tex.id(), size));
    ui.add_space(8.0);
}

/// One-row table of the encoded features with column headers.
pub fn show_feature_table(ui: &mut egui::Ui, vector: &FeatureVector) {
    ui.label(RichText::new("Customer data").strong().size(16.0));
    egui::ScrollArea::horizontal()
        .id_salt("feature_table_scroll")
        .show(ui, |ui| {
            egui::Grid::new("feature_table")
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for (name, _) in vector.columns() {
                        ui.label(RichText::new(name).strong());
                    }
                    ui.end_row();
                    for (_, value) in vector.columns() {
                        ui.label(value.to_string());
                    }
                    ui.end_row();
                });
        });
    ui.add_space(8.0);
}

/// Churn probability, or the error that halted this render pass.
pub fn show_prediction(ui: &mut egui::Ui, outcome: &Result<ChurnPrediction, ChurnError>) {
    ui.label(RichText::new("Churn probability").strong().size(16.0));
    match outcome {
        Ok(prediction) => {
            ui.label(RichText::new(prediction.formatted()).size(28.0));
        }
        Err(e) => {
            ui.colored_label(ui.visuals().error_fg_color, e.to_string());
        }
    }
}
