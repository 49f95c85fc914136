use crate::pipeline::TableStage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Missing-value statistics for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub name: String,
    pub missing_count: usize,
    /// `missing_count / total_rows * 100`; 0.0 for an empty table.
    pub percentage: f64,
}

/// Per-column missing-value report, in table column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueReport {
    pub total_rows: usize,
    pub columns: Vec<ColumnMissing>,
}

impl MissingValueReport {
    /// Look up the statistics of one column.
    pub fn get(&self, column: &str) -> Option<&ColumnMissing> {
        self.columns.iter().find(|c| c.name == column)
    }

    /// Total number of missing cells across all columns.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing_count).sum()
    }

    /// Columns with at least one missing value.
    pub fn columns_with_missing(&self) -> impl Iterator<Item = &ColumnMissing> {
        self.columns.iter().filter(|c| c.missing_count > 0)
    }
}

impl fmt::Display for MissingValueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<16} {:>14} {:>12}", "", "Missing Values", "Percentage")?;
        for column in &self.columns {
            writeln!(
                f,
                "{:<16} {:>14} {:>12.6}",
                column.name, column.missing_count, column.percentage
            )?;
        }
        Ok(())
    }
}

/// What the imputation stage changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationSummary {
    pub age_filled: usize,
    /// Median used for Age; `None` when Age had nothing to fill.
    pub age_median: Option<f64>,
    pub embarked_filled: usize,
    /// Mode used for Embarked; `None` when Embarked had nothing to fill.
    pub embarked_mode: Option<String>,
    /// Rows with a recorded cabin.
    pub cabins_present: usize,
}

/// Code assignment for one encoded feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoding {
    pub feature: String,
    pub encoded_column: String,
    /// Distinct values in code order: `classes[code] == value`.
    pub classes: Vec<String>,
}

impl FeatureEncoding {
    /// Code assigned to a value, if the value was seen.
    pub fn code_of(&self, value: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }
}

/// Result of the encoding stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodingSummary {
    pub encoded: Vec<FeatureEncoding>,
    /// Requested features that were not present in the table.
    pub skipped: Vec<String>,
}

impl EncodingSummary {
    pub fn get(&self, feature: &str) -> Option<&FeatureEncoding> {
        self.encoded.iter().find(|e| e.feature == feature)
    }
}

/// Before/after comparison of the original snapshot and the working table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub generated_at: String,
    pub stage: TableStage,
    pub rows: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub added_columns: Vec<String>,
    pub missing_before: usize,
    pub missing_after: usize,
    /// Share of non-missing cells (0.0 - 1.0).
    pub completeness_before: f64,
    pub completeness_after: f64,
    /// Missing counts per original column, before and after.
    pub missing_by_column: BTreeMap<String, (usize, usize)>,
}

/// Survival rate of one group in a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRate {
    pub label: String,
    pub passengers: usize,
    /// Mean of `Survived` in the group; `None` for an empty group.
    pub rate: Option<f64>,
}

/// Pairwise Pearson correlations over a fixed set of numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major; NaN where a correlation is undefined.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        Some(self.values[i][j])
    }
}

/// Age histogram with counts stacked by survival outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeHistogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    pub perished: Vec<usize>,
    pub survived: Vec<usize>,
}

impl AgeHistogram {
    pub fn bins(&self) -> usize {
        self.perished.len()
    }

    pub fn total(&self) -> usize {
        self.perished.iter().chain(self.survived.iter()).sum()
    }
}
