//! Reading and validating the passenger manifest.
//!
//! Every failure here surfaces as [`ProcessingError::Load`]: an unreadable
//! file, a body polars cannot parse, a missing required column, or a value
//! that does not fit the column's expected type.

use crate::error::{ProcessingError, Result};
use crate::schema::REQUIRED_COLUMNS;
use crate::utils::blank_strings_to_null;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Read a delimited manifest from disk and normalise it.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ProcessingError::Load(format!(
            "source file not found: {}",
            path.display()
        )));
    }

    info!("Reading manifest from {}", path.display());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| ProcessingError::Load(format!("{}: {}", path.display(), e)))?;

    debug!("Raw shape: {:?}", df.shape());
    normalize_manifest(df)
}

/// Validate an in-memory manifest and coerce the required columns.
///
/// Columns outside the required set (e.g. `Ticket`) are kept as read.
pub fn normalize_manifest(mut df: DataFrame) -> Result<DataFrame> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| df.column(name).is_err())
        .collect();

    if !missing.is_empty() {
        return Err(ProcessingError::Load(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    for (name, dtype) in REQUIRED_COLUMNS.iter() {
        let series = df.column(name)?.as_materialized_series().clone();
        let normalized = if *dtype == DataType::String {
            blank_strings_to_null(&series)?
        } else if series.dtype() == dtype {
            series
        } else {
            series.strict_cast(dtype).map_err(|e| {
                ProcessingError::Load(format!(
                    "column '{}' is not {} (found {}): {}",
                    name,
                    dtype,
                    series.dtype(),
                    e
                ))
            })?
        };
        df.replace(name, normalized)?;
    }

    info!("Manifest loaded: {} rows x {} columns", df.height(), df.width());
    Ok(df)
}
