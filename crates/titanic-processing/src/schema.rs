//! Column names and value domains of the passenger manifest.

use polars::prelude::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PASSENGER_ID: &str = "PassengerId";
pub const SURVIVED: &str = "Survived";
pub const PCLASS: &str = "Pclass";
pub const NAME: &str = "Name";
pub const SEX: &str = "Sex";
pub const AGE: &str = "Age";
pub const SIBSP: &str = "SibSp";
pub const PARCH: &str = "Parch";
pub const FARE: &str = "Fare";
pub const CABIN: &str = "Cabin";
pub const EMBARKED: &str = "Embarked";

pub const HAS_CABIN: &str = "HasCabin";
pub const TITLE: &str = "Title";
pub const AGE_GROUP: &str = "AgeGroup";
pub const FAMILY_SIZE: &str = "FamilySize";

/// Suffix of the numeric sibling column written by the encoder.
pub const ENCODED_SUFFIX: &str = "_Encoded";

/// Columns the loader requires, with the dtype each is normalised to.
pub const REQUIRED_COLUMNS: [(&str, DataType); 11] = [
    (PASSENGER_ID, DataType::Int64),
    (SURVIVED, DataType::Int64),
    (PCLASS, DataType::Int64),
    (NAME, DataType::String),
    (SEX, DataType::String),
    (AGE, DataType::Float64),
    (SIBSP, DataType::Int64),
    (PARCH, DataType::Int64),
    (FARE, DataType::Float64),
    (CABIN, DataType::String),
    (EMBARKED, DataType::String),
];

/// Numeric fields shown in the correlation heat-map, in display order.
pub const CORRELATION_FIELDS: [&str; 6] = [SURVIVED, PCLASS, AGE, SIBSP, PARCH, FARE];

/// Name of the encoded sibling column for a categorical feature.
pub fn encoded_column_name(feature: &str) -> String {
    format!("{feature}{ENCODED_SUFFIX}")
}

/// Ordinal age bucket derived from an imputed age.
///
/// Each bin includes its upper edge; `Senior` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Child,
    Teen,
    YoungAdult,
    Adult,
    Senior,
}

impl AgeGroup {
    /// Bucket an age: [0,12], (12,18], (18,35], (35,50], (50,inf).
    ///
    /// Negative and non-finite ages have no bucket.
    pub fn from_age(age: f64) -> Option<Self> {
        if !age.is_finite() || age < 0.0 {
            return None;
        }
        let group = if age <= 12.0 {
            AgeGroup::Child
        } else if age <= 18.0 {
            AgeGroup::Teen
        } else if age <= 35.0 {
            AgeGroup::YoungAdult
        } else if age <= 50.0 {
            AgeGroup::Adult
        } else {
            AgeGroup::Senior
        };
        Some(group)
    }

    /// Label written into the `AgeGroup` column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Child => "Child",
            Self::Teen => "Teen",
            Self::YoungAdult => "Young Adult",
            Self::Adult => "Adult",
            Self::Senior => "Senior",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
