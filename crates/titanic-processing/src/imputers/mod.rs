//! Imputation module for handling missing values.
//!
//! Statistical imputation only: median for numeric columns and mode for
//! categorical ones.

mod statistical;

pub use statistical::{Fill, StatisticalImputer};
