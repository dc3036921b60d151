//! Feature vector construction for churn model inference.
//!
//! Turns the operator's form selections into the single row the classifier
//! consumes. Categorical selections are replaced by their integer codes and
//! numeric values pass through untouched.

use crate::types::categories::Category;
use crate::types::customer::FormState;
use crate::types::schema::{FEATURE_COUNT, FEATURE_NAMES};

/// One customer encoded in model input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector {
    pub gender: i64,
    pub marital_status: i64,
    pub card_category: i64,
    pub customer_age: i64,
    pub months_on_book: i64,
    pub total_relationship_count: i64,
    pub months_inactive_12_mon: i64,
    pub contacts_count_12_mon: i64,
    pub credit_limit: i64,
    pub total_revolving_bal: i64,
    pub total_amt_chng_q4_q1: i64,
    pub total_trans_ct: i64,
    pub total_ct_chng_q4_q1: i64,
}

impl FeatureVector {
    /// Values in schema order, matching [`FEATURE_NAMES`].
    pub fn values(&self) -> [i64; FEATURE_COUNT] {
        [
            self.gender,
            self.marital_status,
            self.card_category,
            self.customer_age,
            self.months_on_book,
            self.total_relationship_count,
            self.months_inactive_12_mon,
            self.contacts_count_12_mon,
            self.credit_limit,
            self.total_revolving_bal,
            self.total_amt_chng_q4_q1,
            self.total_trans_ct,
            self.total_ct_chng_q4_q1,
        ]
    }

    /// Float row for the model input tensor.
    ///
    /// Every slider bound is well inside the exactly representable f32 integer
    /// range, so the conversion is lossless.
    pub fn to_model_row(&self) -> [f32; FEATURE_COUNT] {
        self.values().map(|v| v as f32)
    }

    /// `(column, value)` pairs in schema order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, i64)> {
        FEATURE_NAMES.into_iter().zip(self.values())
    }
}

/// Builds feature vectors from form selections.
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Encode the form state into a feature vector.
    ///
    /// Total and deterministic: the form only offers labels that have a code.
    pub fn build(&self, form: &FormState) -> FeatureVector {
        FeatureVector {
            gender: form.gender.code(),
            marital_status: form.marital_status.code(),
            card_category: form.card_category.code(),
            customer_age: form.customer_age,
            months_on_book: form.months_on_book,
            total_relationship_count: form.total_relationship_count,
            months_inactive_12_mon: form.months_inactive_12_mon,
            contacts_count_12_mon: form.contacts_count_12_mon,
            credit_limit: form.credit_limit,
            total_revolving_bal: form.total_revolving_bal,
            total_amt_chng_q4_q1: form.total_amt_chng_q4_q1,
            total_trans_ct: form.total_trans_ct,
            total_ct_chng_q4_q1: form.total_ct_chng_q4_q1,
        }
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
