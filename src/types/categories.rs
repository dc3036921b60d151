//! Category code maps for the categorical model inputs.
//!
//! Each categorical field offers a fixed, ordered set of labels. The integer
//! code of a label is its position in that set, which is the encoding the
//! classifier was trained on.

use crate::error::{ChurnError, Result};

/// A categorical field whose labels map to fixed integer codes.
pub trait Category: Copy + PartialEq + std::fmt::Debug + 'static {
    /// Column name of the field in the feature schema.
    const FIELD: &'static str;

    /// Every option, in code order.
    fn all() -> &'static [Self];

    fn label(self) -> &'static str;

    fn code(self) -> i64;

    /// Look up an option by its display label.
    fn from_label(label: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|option| option.label() == label)
            .ok_or_else(|| ChurnError::UnknownLabel {
                field: Self::FIELD,
                label: label.to_string(),
            })
    }
}

macro_rules! category {
    ($(#[$meta:meta])* $name:ident, $field:literal, [$($variant:ident = $code:literal => $label:literal),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl Category for $name {
            const FIELD: &'static str = $field;

            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn code(self) -> i64 {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }
    };
}

category!(
    /// Customer gender.
    Gender, "Gender", [
        Female = 0 => "Female",
        Male = 1 => "Male",
    ]
);

category!(
    /// Customer marital status.
    MaritalStatus, "Marital_Status", [
        Divorced = 0 => "Divorced",
        Married = 1 => "Married",
        Single = 2 => "Single",
    ]
);

category!(
    /// Credit card tier.
    CardCategory, "Card_Category", [
        Blue = 0 => "Blue",
        Gold = 1 => "Gold",
        Platinum = 2 => "Platinum",
        Silver = 3 => "Silver",
    ]
);

/// Categorical columns of the feature schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Gender,
    MaritalStatus,
    CardCategory,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 3] = [
        CategoricalField::Gender,
        CategoricalField::MaritalStatus,
        CategoricalField::CardCategory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoricalField::Gender => Gender::FIELD,
            CategoricalField::MaritalStatus => MaritalStatus::FIELD,
            CategoricalField::CardCategory => CardCategory::FIELD,
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            CategoricalField::Gender => "Gender",
            CategoricalField::MaritalStatus => "Marital status",
            CategoricalField::CardCategory => "Card category",
        }
    }

    /// Labels offered for this field, in code order.
    pub fn labels(self) -> Vec<&'static str> {
        match self {
            CategoricalField::Gender => labels_of::<Gender>(),
            CategoricalField::MaritalStatus => labels_of::<MaritalStatus>(),
            CategoricalField::CardCategory => labels_of::<CardCategory>(),
        }
    }
}

fn labels_of<C: Category>() -> Vec<&'static str> {
    C::all().iter().map(|option| option.label()).collect()
}

/// Translate a display label into the integer code the model expects.
pub fn encode(field: CategoricalField, label: &str) -> Result<i64> {
    match field {
        CategoricalField::Gender => Gender::from_label(label).map(Gender::code),
        CategoricalField::MaritalStatus => MaritalStatus::from_label(label).map(MaritalStatus::code),
        CategoricalField::CardCategory => CardCategory::from_label(label).map(CardCategory::code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_training_encoding() {
        assert_eq!(encode(CategoricalField::Gender, "Female").unwrap(), 0);
        assert_eq!(encode(CategoricalField::Gender, "Male").unwrap(), 1);
        assert_eq!(encode(CategoricalField::MaritalStatus, "Divorced").unwrap(), 0);
        assert_eq!(encode(CategoricalField::MaritalStatus, "Married").unwrap(), 1);
        assert_eq!(encode(CategoricalField::MaritalStatus, "Single").unwrap(), 2);
        assert_eq!(encode(CategoricalField::CardCategory, "Blue").unwrap(), 0);
        assert_eq!(encode(CategoricalField::CardCategory, "Gold").unwrap(), 1);
        assert_eq!(encode(CategoricalField::CardCategory, "Platinum").unwrap(), 2);
        assert_eq!(encode(CategoricalField::CardCategory, "Silver").unwrap(), 3);
    }

    #[test]
    fn test_every_offered_label_encodes_within_range() {
        let expected_max = [1, 2, 3];
        for (field, max) in CategoricalField::ALL.into_iter().zip(expected_max) {
            for label in field.labels() {
                let code = encode(field, label).unwrap();
                assert!((0..=max).contains(&code), "{} {} -> {}", field.name(), label, code);
            }
        }
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = encode(CategoricalField::CardCategory, "Black").unwrap_err();
        assert!(matches!(
            err,
            ChurnError::UnknownLabel { field: "Card_Category", .. }
        ));

        // Labels are case sensitive.
        assert!(encode(CategoricalField::Gender, "female").is_err());
    }

    #[test]
    fn test_default_is_first_option() {
        assert_eq!(Gender::default(), Gender::Female);
        assert_eq!(MaritalStatus::default(), MaritalStatus::Divorced);
        assert_eq!(CardCategory::default(), CardCategory::Blue);
    }
}
