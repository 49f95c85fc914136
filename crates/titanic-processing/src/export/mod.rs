//! Persistence of the final table.
//!
//! Each target implements [`TableExporter`] over the same finished
//! `&DataFrame`; a failing target does not affect the others.

mod csv;
mod excel;
mod sqlite;

pub use csv::CsvExporter;
pub use excel::ExcelExporter;
pub use sqlite::SqliteExporter;

use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::utils::{is_integer_dtype, is_numeric_dtype};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// A persistence target for a finished table.
pub trait TableExporter {
    /// Short target name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Write `df` and return the path written.
    fn export(&self, df: &DataFrame) -> Result<PathBuf>;
}

/// Outcome of one export target.
#[derive(Debug)]
pub struct ExportOutcome {
    pub target: &'static str,
    pub result: Result<PathBuf>,
}

/// Exporters configured by `config`: SQLite, spreadsheet and the optional CSV copy.
pub fn configured_exporters(config: &PipelineConfig) -> Vec<Box<dyn TableExporter>> {
    let mut exporters: Vec<Box<dyn TableExporter>> = vec![
        Box::new(SqliteExporter::new(config.sqlite_path(), &config.table_name)),
        Box::new(ExcelExporter::new(config.excel_path())),
    ];
    if let Some(path) = config.csv_path() {
        exporters.push(Box::new(CsvExporter::new(path)));
    }
    exporters
}

/// Run every exporter, continuing past failures.
pub fn export_all(df: &DataFrame, exporters: &[Box<dyn TableExporter>]) -> Vec<ExportOutcome> {
    exporters
        .iter()
        .map(|exporter| {
            let result = exporter.export(df);
            match &result {
                Ok(path) => info!("Exported {} rows to {}", df.height(), path.display()),
                Err(e) => error!("{} export failed: {}", exporter.name(), e),
            }
            ExportOutcome {
                target: exporter.name(),
                result,
            }
        })
        .collect()
}

/// A column converted to the three storage classes both writers understand.
pub(crate) enum CellColumn {
    Integer(Vec<Option<i64>>),
    Real(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl CellColumn {
    /// Booleans and integers become `Integer`, floats `Real`, everything else `Text`.
    pub(crate) fn from_series(series: &Series) -> Result<Self> {
        let dtype = series.dtype();
        if is_integer_dtype(dtype) || dtype == &DataType::Boolean {
            let ints = series.cast(&DataType::Int64)?;
            Ok(Self::Integer(ints.i64()?.into_iter().collect()))
        } else if is_numeric_dtype(dtype) {
            let floats = series.cast(&DataType::Float64)?;
            // NaN has no representation in either target
            Ok(Self::Real(
                floats
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|f| !f.is_nan()))
                    .collect(),
            ))
        } else {
            let strings = series.cast(&DataType::String)?;
            Ok(Self::Text(
                strings
                    .str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect(),
            ))
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn export_error(target: &'static str, path: &Path, e: ProcessingError) -> ProcessingError {
    ProcessingError::export(format!("{} ({})", target, path.display()), e)
}
