use super::{TableExporter, ensure_parent_dir, export_error};
use crate::error::Result;
use polars::prelude::*;
use std::fs::File;
use std::path::PathBuf;

/// Writes a comma-separated copy of the table with a header row.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write(&self, df: &DataFrame) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        let mut file = File::create(&self.path)?;
        let mut df = df.clone();

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)?;
        Ok(())
    }
}

impl TableExporter for CsvExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn export(&self, df: &DataFrame) -> Result<PathBuf> {
        self.write(df)
            .map_err(|e| export_error(self.name(), &self.path, e))?;
        Ok(self.path.clone())
    }
}
