use super::{CellColumn, TableExporter, ensure_parent_dir, export_error};
use crate::error::{ProcessingError, Result};
use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// Writes the table to a single-sheet `.xlsx` workbook.
///
/// Row 0 holds the column names; there is no index column and missing
/// values are left as blank cells.
#[derive(Debug, Clone)]
pub struct ExcelExporter {
    path: PathBuf,
}

impl ExcelExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, df: &DataFrame) -> Result<()> {
        ensure_parent_dir(&self.path)?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header = Format::new().set_bold();

        for (idx, column) in df.get_columns().iter().enumerate() {
            let col = u16::try_from(idx).map_err(|_| {
                ProcessingError::export("xlsx", format!("{} columns do not fit a sheet", df.width()))
            })?;
            worksheet.write_string_with_format(0, col, column.name().as_str(), &header)?;

            match CellColumn::from_series(column.as_materialized_series())? {
                CellColumn::Integer(values) => {
                    for (row, value) in values.into_iter().enumerate() {
                        if let Some(v) = value {
                            worksheet.write_number(sheet_row(row)?, col, v as f64)?;
                        }
                    }
                }
                CellColumn::Real(values) => {
                    for (row, value) in values.into_iter().enumerate() {
                        if let Some(v) = value {
                            worksheet.write_number(sheet_row(row)?, col, v)?;
                        }
                    }
                }
                CellColumn::Text(values) => {
                    for (row, value) in values.into_iter().enumerate() {
                        if let Some(v) = value {
                            worksheet.write_string(sheet_row(row)?, col, v)?;
                        }
                    }
                }
            }
        }

        workbook.save(&self.path)?;
        Ok(())
    }
}

/// Sheet row of a table row; row 0 is the header.
fn sheet_row(row: usize) -> Result<u32> {
    u32::try_from(row + 1)
        .map_err(|_| ProcessingError::export("xlsx", format!("row {} does not fit a sheet", row)))
}

impl TableExporter for ExcelExporter {
    fn name(&self) -> &'static str {
        "xlsx"
    }

    fn export(&self, df: &DataFrame) -> Result<PathBuf> {
        self.write(df)
            .map_err(|e| export_error(self.name(), &self.path, e))?;
        Ok(self.path.clone())
    }
}
