//! Data quality analysis module.
//!
//! Read-only inspection of a table: per-column missing values and the
//! before/after comparison of a processing run.

mod analyzer;

pub use analyzer::DataQualityAnalyzer;
