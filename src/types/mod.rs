//! Type definitions for the churn form

pub mod categories;
pub mod customer;
pub mod schema;

pub use categories::{encode, CardCategory, Category, CategoricalField, Gender, MaritalStatus};
pub use customer::FormState;
pub use schema::{NumericField, NumericSpec, FEATURE_COUNT, FEATURE_NAMES};
