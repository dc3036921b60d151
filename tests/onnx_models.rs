//! Small ONNX models in `tests/fixtures/`: a softmax over a linear layer with
//! weights on inactivity (+0.5), contacts (+0.5) and transaction count (-0.02),
//! churn bias -1.
//!
//! - `churn_13.onnx`: 13-column input, `probabilities` output
//! - `churn_36.onnx`: same layer over a 36-column input
//! - `churn_scores_label.onnx`: 13-column input, `scores` then `label` outputs

use churn_predictor::models::loader::ModelLoader;
use churn_predictor::types::{CardCategory, Gender, MaritalStatus};
use churn_predictor::{predict_churn_probability, ChurnError, FeatureExtractor, FormState};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn reference_form() -> FormState {
    FormState {
        gender: Gender::Female,
        marital_status: MaritalStatus::Married,
        card_category: CardCategory::Blue,
        ..FormState::default()
    }
}

/// sigmoid(0.5 * 2 + 0.5 * 2 - 0.02 * 100 - 1)
const REFERENCE_CHURN: f64 = 0.268_941_4;

#[test]
fn schema_width_model_loads_and_scores() {
    let model = ModelLoader::new().load_model(fixture("churn_13.onnx")).unwrap();
    assert_eq!(model.input_name(), "features");
    assert_eq!(model.output_name(), "probabilities");

    let vector = FeatureExtractor::new().build(&reference_form());
    let first = predict_churn_probability(&model, &vector).unwrap();
    assert!((0.0..=1.0).contains(&first));
    assert!((first - REFERENCE_CHURN).abs() < 1e-4, "got {first}");

    for _ in 0..5 {
        let again = predict_churn_probability(&model, &vector).unwrap();
        assert_eq!(first.to_bits(), again.to_bits());
    }
}

#[test]
fn wider_model_is_rejected_at_load() {
    let err = ModelLoader::new()
        .load_model(fixture("churn_36.onnx"))
        .unwrap_err();

    assert!(matches!(err, ChurnError::Load { .. }));
    assert!(err.to_string().contains("36"), "{err}");
}

#[test]
fn label_output_is_skipped_for_scores() {
    let model = ModelLoader::new()
        .load_model(fixture("churn_scores_label.onnx"))
        .unwrap();
    // No output mentions "prob", so the last one (the label) is selected first
    assert_eq!(model.output_name(), "label");

    let vector = FeatureExtractor::new().build(&reference_form());
    let churn = predict_churn_probability(&model, &vector).unwrap();
    assert!((churn - REFERENCE_CHURN).abs() < 1e-4, "got {churn}");
}

#[test]
fn rescoring_follows_the_form() {
    let model = ModelLoader::new().load_model(fixture("churn_13.onnx")).unwrap();
    let extractor = FeatureExtractor::new();
    let mut form = reference_form();

    let before = predict_churn_probability(&model, &extractor.build(&form)).unwrap();
    form.months_inactive_12_mon = 6;
    let after = predict_churn_probability(&model, &extractor.build(&form)).unwrap();

    assert!(after > before);
}
