//! Shared utilities for the processing pipeline.
//!
//! This module contains small series helpers used across the imputation,
//! feature and encoding stages.

use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) && !matches!(dtype, DataType::Float32 | DataType::Float64)
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Most frequent non-null value of a Series, rendered as text.
///
/// Ties go to the value that appears first in row order.
pub fn string_mode(series: &Series) -> Option<String> {
    let str_series = series.cast(&DataType::String).ok()?;
    let str_chunked = str_series.str().ok()?;

    // value -> (count, first row index)
    let mut value_counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, val) in str_chunked.into_iter().enumerate() {
        if let Some(val) = val {
            value_counts.entry(val).or_insert((0, idx)).0 += 1;
        }
    }

    value_counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(val, _)| val.to_string())
}

/// Sorted distinct non-null values of a String series.
pub fn sorted_distinct(values: &StringChunked) -> Vec<String> {
    let mut distinct: Vec<String> = values
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    distinct.sort_unstable();
    distinct.dedup();
    distinct
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is Float64 regardless of the input numeric type.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let floats = series.cast(&DataType::Float64)?;
    let filled: Float64Chunked = floats
        .f64()?
        .into_iter()
        .map(|val| Some(val.unwrap_or(fill_value)))
        .collect();

    Ok(filled.with_name(series.name().clone()).into_series())
}

/// Fill null values in a Series with a string value.
///
/// Non-string inputs are cast to their textual representation first.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let strings = series.cast(&DataType::String)?;
    let filled: StringChunked = strings
        .str()?
        .into_iter()
        .map(|val| Some(val.unwrap_or(fill_value)))
        .collect();

    Ok(filled.with_name(series.name().clone()).into_series())
}

/// Treat empty or whitespace-only strings as missing.
pub fn blank_strings_to_null(series: &Series) -> PolarsResult<Series> {
    let strings = series.cast(&DataType::String)?;
    let cleaned: StringChunked = strings
        .str()?
        .into_iter()
        .map(|val| val.filter(|s| !s.trim().is_empty()))
        .collect();

    Ok(cleaned.with_name(series.name().clone()).into_series())
}

/// Missing cells across every column of a DataFrame.
pub fn total_null_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|col| col.null_count()).sum()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_is_integer_dtype() {
        assert!(is_integer_dtype(&DataType::Int32));
        assert!(is_integer_dtype(&DataType::UInt8));
        assert!(!is_integer_dtype(&DataType::Float64));
    }

    #[test]
    fn test_string_mode() {
        let series = Series::new("test".into(), &["a", "b", "a", "c", "a"]);
        assert_eq!(string_mode(&series), Some("a".to_string()));
    }

    #[test]
    fn test_string_mode_tie_goes_to_first_seen() {
        let series = Series::new("test".into(), &[Some("S"), None, Some("C")]);
        assert_eq!(string_mode(&series), Some("S".to_string()));

        let series = Series::new("test".into(), &["Q", "C", "C", "Q"]);
        assert_eq!(string_mode(&series), Some("Q".to_string()));
    }

    #[test]
    fn test_string_mode_all_null() {
        let series = Series::new("test".into(), &[Option::<&str>::None, None]);
        assert_eq!(string_mode(&series), None);
    }

    #[test]
    fn test_sorted_distinct() {
        let series = Series::new("test".into(), &[Some("b"), None, Some("a"), Some("b")]);
        assert_eq!(sorted_distinct(series.str().unwrap()), vec!["a", "b"]);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1i64), None, Some(3)]);
        let filled = fill_numeric_nulls(&series, 2.5).unwrap();

        assert_eq!(filled.dtype(), &DataType::Float64);
        assert_eq!(filled.name().as_str(), "test");
        let values: Vec<Option<f64>> = filled.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(2.5), Some(3.0)]);
    }

    #[test]
    fn test_fill_string_nulls_keeps_values_unquoted() {
        let series = Series::new("test".into(), &[Some("S"), None, Some("C")]);
        let filled = fill_string_nulls(&series, "S").unwrap();

        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("S"), Some("S"), Some("C")]);
    }

    #[test]
    fn test_blank_strings_to_null() {
        let series = Series::new("test".into(), &[Some("C85"), Some(""), Some("  "), None]);
        let cleaned = blank_strings_to_null(&series).unwrap();
        assert_eq!(cleaned.null_count(), 3);
    }

    #[test]
    fn test_total_null_count() {
        let df = df![
            "a" => [Some(1.0), None],
            "b" => [None, Some("x")],
        ]
        .unwrap();
        assert_eq!(total_null_count(&df), 2);
    }
}
