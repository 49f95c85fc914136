//! Statistical imputation methods.
//!
//! Median for numeric columns, mode for categorical ones. Both statistics
//! are computed from the column as it is at call time.

use crate::error::{ProcessingError, Result};
use crate::utils::{fill_numeric_nulls, fill_string_nulls, is_numeric_dtype, string_mode};
use polars::prelude::*;
use tracing::debug;

/// Outcome of filling one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill<T> {
    /// Number of cells that were missing and are now filled.
    pub filled: usize,
    /// Statistic used; `None` when there was nothing to fill.
    pub value: Option<T>,
}

impl<T> Fill<T> {
    fn noop() -> Self {
        Fill {
            filled: 0,
            value: None,
        }
    }
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill a numeric column's nulls with the median of its non-null values.
    ///
    /// A column without nulls is left untouched. A column with only nulls has
    /// no median and yields [`ProcessingError::Imputation`].
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<Fill<f64>> {
        let series = df
            .column(col_name)
            .map_err(|_| ProcessingError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        if !is_numeric_dtype(series.dtype()) && series.dtype() != &DataType::Null {
            return Err(ProcessingError::imputation(
                col_name,
                format!("median needs a numeric column, found {}", series.dtype()),
            ));
        }

        let missing = series.null_count();
        if missing == 0 {
            debug!("'{}' has no missing values, skipping median fill", col_name);
            return Ok(Fill::noop());
        }

        let median_val = series
            .median()
            .ok_or_else(|| ProcessingError::imputation(col_name, "all values are missing"))?;

        let filled = fill_numeric_nulls(&series, median_val)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled '{}' with median: {:.2} ({} values)",
            col_name, median_val, missing
        ));

        Ok(Fill {
            filled: missing,
            value: Some(median_val),
        })
    }

    /// Fill a categorical column's nulls with its most frequent value.
    ///
    /// Ties are broken by first occurrence in row order.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<Fill<String>> {
        let series = df
            .column(col_name)
            .map_err(|_| ProcessingError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let missing = series.null_count();
        if missing == 0 {
            debug!("'{}' has no missing values, skipping mode fill", col_name);
            return Ok(Fill::noop());
        }

        let mode_val = string_mode(&series)
            .ok_or_else(|| ProcessingError::imputation(col_name, "all values are missing"))?;

        let filled = fill_string_nulls(&series, &mode_val)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled '{}' with mode: '{}' ({} values)",
            col_name, mode_val, missing
        ));

        Ok(Fill {
            filled: missing,
            value: Some(mode_val),
        })
    }
}
