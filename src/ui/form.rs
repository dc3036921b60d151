//! Sidebar input controls.

use crate::types::categories::{Category, CategoricalField};
use crate::types::customer::FormState;
use crate::types::schema::NumericField;
use eframe::egui::{self, SliderClamping};

/// Draw every input control and report whether any selection changed.
pub fn show_form(ui: &mut egui::Ui, state: &mut FormState) -> bool {
    let mut changed = false;

    changed |= radio_group(ui, CategoricalField::Gender.caption(), &mut state.gender);
    changed |= radio_group(
        ui,
        CategoricalField::MaritalStatus.caption(),
        &mut state.marital_status,
    );
    changed |= radio_group(
        ui,
        CategoricalField::CardCategory.caption(),
        &mut state.card_category,
    );

    for field in NumericField::ALL {
        changed |= slider(ui, field, state.numeric_mut(field));
    }

    changed
}

fn radio_group<C: Category>(ui: &mut egui::Ui, caption: &str, current: &mut C) -> bool {
    let mut changed = false;
    ui.label(caption);
    ui.horizontal(|ui| {
        for &option in C::all() {
            changed |= ui.radio_value(current, option, option.label()).changed();
        }
    });
    ui.add_space(6.0);
    changed
}

fn slider(ui: &mut egui::Ui, field: NumericField, value: &mut i64) -> bool {
    let spec = field.spec();
    ui.label(spec.caption);
    // Edits clamp to the range; an out-of-range default stays until moved.
    let slider = egui::Slider::new(value, spec.min..=spec.max)
        .step_by(spec.step as f64)
        .clamping(SliderClamping::Edits);
    let changed = ui.add(slider).changed();
    ui.add_space(6.0);
    changed
}
