//! Operator-entered customer attributes

use crate::types::categories::{CardCategory, Gender, MaritalStatus};
use crate::types::schema::NumericField;

/// Current selections of the input form.
///
/// Every render pass reads one `FormState` by reference; the form controls
/// are the only writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormState {
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub card_category: CardCategory,
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

impl FormState {
    pub fn numeric(&self, field: NumericField) -> i64 {
        match field {
            NumericField::CustomerAge => self.customer_age,
            NumericField::MonthsOnBook => self.months_on_book,
            NumericField::TotalRelationshipCount => self.total_relationship_count,
            NumericField::MonthsInactive12Mon => self.months_inactive_12_mon,
            NumericField::ContactsCount12Mon => self.contacts_count_12_mon,
            NumericField::CreditLimit => self.credit_limit,
            NumericField::TotalRevolvingBal => self.total_revolving_bal,
            NumericField::TotalAmtChngQ4Q1 => self.total_amt_chng_q4_q1,
            NumericField::TotalTransCt => self.total_trans_ct,
            NumericField::TotalCtChngQ4Q1 => self.total_ct_chng_q4_q1,
        }
    }

    pub fn numeric_mut(&mut self, field: NumericField) -> &mut i64 {
        match field {
            NumericField::CustomerAge => &mut self.customer_age,
            NumericField::MonthsOnBook => &mut self.months_on_book,
            NumericField::TotalRelationshipCount => &mut self.total_relationship_count,
            NumericField::MonthsInactive12Mon => &mut self.months_inactive_12_mon,
            NumericField::ContactsCount12Mon => &mut self.contacts_count_12_mon,
            NumericField::CreditLimit => &mut self.credit_limit,
            NumericField::TotalRevolvingBal => &mut self.total_revolving_bal,
            NumericField::TotalAmtChngQ4Q1 => &mut self.total_amt_chng_q4_q1,
            NumericField::TotalTransCt => &mut self.total_trans_ct,
            NumericField::TotalCtChngQ4Q1 => &mut self.total_ct_chng_q4_q1,
        }
    }
}

impl Default for FormState {
    /// First option of every radio group and the slider defaults.
    fn default() -> Self {
        let mut state = Self {
            gender: Gender::default(),
            marital_status: MaritalStatus::default(),
            card_category: CardCategory::default(),
            customer_age: 0,
            months_on_book: 0,
            total_relationship_count: 0,
            months_inactive_12_mon: 0,
            contacts_count_12_mon: 0,
            credit_limit: 0,
            total_revolving_bal: 0,
            total_amt_chng_q4_q1: 0,
            total_trans_ct: 0,
            total_ct_chng_q4_q1: 0,
        };
        for field in NumericField::ALL {
            *state.numeric_mut(field) = field.spec().default;
        }
        state
    }
}
