//! Feature schema of the churn classifier.
//!
//! The column order here is the order the model was trained on. It must not be
//! reordered without re-exporting the model.

use crate::types::categories::{CardCategory, Category, Gender, MaritalStatus};

/// Number of input columns the classifier expects.
pub const FEATURE_COUNT: usize = 13;

/// Column names in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    Gender::FIELD,
    MaritalStatus::FIELD,
    CardCategory::FIELD,
    "Customer_Age",
    "Months_on_book",
    "Total_Relationship_Count",
    "Months_Inactive_12_mon",
    "Contacts_Count_12_mon",
    "Credit_Limit",
    "Total_Revolving_Bal",
    "Total_Amt_Chng_Q4_Q1",
    "Total_Trans_Ct",
    "Total_Ct_Chng_Q4_Q1",
];

/// Bounded integer inputs, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    CustomerAge,
    MonthsOnBook,
    TotalRelationshipCount,
    MonthsInactive12Mon,
    ContactsCount12Mon,
    CreditLimit,
    TotalRevolvingBal,
    TotalAmtChngQ4Q1,
    TotalTransCt,
    TotalCtChngQ4Q1,
}

/// Slider configuration for one numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSpec {
    pub name: &'static str,
    pub caption: &'static str,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub default: i64,
}

impl NumericSpec {
    const fn new(
        name: &'static str,
        caption: &'static str,
        min: i64,
        max: i64,
        default: i64,
    ) -> Self {
        Self {
            name,
            caption,
            min,
            max,
            step: 1,
            default,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl NumericField {
    pub const ALL: [NumericField; 10] = [
        NumericField::CustomerAge,
        NumericField::MonthsOnBook,
        NumericField::TotalRelationshipCount,
        NumericField::MonthsInactive12Mon,
        NumericField::ContactsCount12Mon,
        NumericField::CreditLimit,
        NumericField::TotalRevolvingBal,
        NumericField::TotalAmtChngQ4Q1,
        NumericField::TotalTransCt,
        NumericField::TotalCtChngQ4Q1,
    ];

    /// Bounds, default and caption for this field.
    ///
    /// `MonthsOnBook` defaults below its minimum; the slider keeps that value
    /// until the operator moves it.
    pub const fn spec(self) -> NumericSpec {
        match self {
            NumericField::CustomerAge => NumericSpec::new("Customer_Age", "Age", 26, 73, 42),
            NumericField::MonthsOnBook => NumericSpec::new(
                "Months_on_book",
                "Months since the card was activated",
                26,
                73,
                5,
            ),
            NumericField::TotalRelationshipCount => NumericSpec::new(
                "Total_Relationship_Count",
                "Number of bank products held",
                1,
                6,
                2,
            ),
            NumericField::MonthsInactive12Mon => NumericSpec::new(
                "Months_Inactive_12_mon",
                "Inactive months in the last year",
                0,
                6,
                2,
            ),
            NumericField::ContactsCount12Mon => NumericSpec::new(
                "Contacts_Count_12_mon",
                "Contacts with the customer in the last year",
                0,
                6,
                2,
            ),
            NumericField::CreditLimit => {
                NumericSpec::new("Credit_Limit", "Credit limit", 1400, 34510, 3000)
            }
            NumericField::TotalRevolvingBal => {
                NumericSpec::new("Total_Revolving_Bal", "Revolving balance", 0, 2517, 1000)
            }
            NumericField::TotalAmtChngQ4Q1 => NumericSpec::new(
                "Total_Amt_Chng_Q4_Q1",
                "Change in transaction amount Q4/Q1",
                0,
                4,
                2,
            ),
            NumericField::TotalTransCt => {
                NumericSpec::new("Total_Trans_Ct", "Number of transactions", 10, 139, 100)
            }
            NumericField::TotalCtChngQ4Q1 => NumericSpec::new(
                "Total_Ct_Chng_Q4_Q1",
                "Change in transaction count Q4/Q1",
                0,
                4,
                2,
            ),
        }
    }
}
