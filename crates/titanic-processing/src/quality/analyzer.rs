use crate::pipeline::TableStage;
use crate::types::{ColumnMissing, MissingValueReport, ProcessingSummary};
use crate::utils::total_null_count;
use polars::prelude::*;
use std::collections::BTreeMap;

pub struct DataQualityAnalyzer;

impl DataQualityAnalyzer {
    /// Count missing cells per column, in column order.
    pub fn analyze_missing_values(df: &DataFrame) -> MissingValueReport {
        let total_rows = df.height();

        let columns = df
            .get_columns()
            .iter()
            .map(|col| {
                let missing_count = col.null_count();
                let percentage = if total_rows == 0 {
                    0.0
                } else {
                    missing_count as f64 / total_rows as f64 * 100.0
                };
                ColumnMissing {
                    name: col.name().to_string(),
                    missing_count,
                    percentage,
                }
            })
            .collect();

        MissingValueReport {
            total_rows,
            columns,
        }
    }

    /// Compare the load-time snapshot with the working table.
    pub fn compare(original: &DataFrame, current: &DataFrame, stage: TableStage) -> ProcessingSummary {
        let added_columns: Vec<String> = current
            .get_column_names()
            .into_iter()
            .filter(|name| original.column(name).is_err())
            .map(|name| name.to_string())
            .collect();

        let missing_by_column: BTreeMap<String, (usize, usize)> = original
            .get_columns()
            .iter()
            .map(|col| {
                let after = current
                    .column(col.name())
                    .map(|c| c.null_count())
                    .unwrap_or(0);
                (col.name().to_string(), (col.null_count(), after))
            })
            .collect();

        let missing_before = total_null_count(original);
        let missing_after = total_null_count(current);

        ProcessingSummary {
            generated_at: chrono::Utc::now().to_rfc3339(),
            stage,
            rows: current.height(),
            columns_before: original.width(),
            columns_after: current.width(),
            added_columns,
            missing_before,
            missing_after,
            completeness_before: completeness(original, missing_before),
            completeness_after: completeness(current, missing_after),
            missing_by_column,
        }
    }
}

/// Share of non-missing cells; an empty table counts as complete.
fn completeness(df: &DataFrame, missing: usize) -> f64 {
    let cells = df.height() * df.width();
    if cells == 0 {
        1.0
    } else {
        1.0 - missing as f64 / cells as f64
    }
}
