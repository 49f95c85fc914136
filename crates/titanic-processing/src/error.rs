//! Custom error types for the Titanic processing pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Load and
//! imputation failures are fatal to a run; render failures are collected
//! per chart by the renderer, with their cause chain, and never abort the run.
//!
//! Errors are serializable so the driver can emit them as JSON alongside
//! the processing summary.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the processing pipeline.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The source file could not be read or does not have the expected shape.
    #[error("Failed to load dataset: {0}")]
    Load(String),

    /// An operation was invoked before any table was loaded.
    #[error("No table loaded: call load() before '{0}'")]
    UninitializedState(&'static str),

    /// A stage was invoked before the stage it depends on completed.
    #[error("Cannot run '{operation}' before {required} (current stage: {current})")]
    StageOrder {
        operation: &'static str,
        required: &'static str,
        current: &'static str,
    },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// A fill statistic is undefined or the imputation postcondition failed.
    #[error("Failed to impute missing values in column '{column}': {reason}")]
    Imputation { column: String, reason: String },

    /// A categorical value has no code in the fitted encoder.
    #[error("Failed to encode feature '{feature}': {reason}")]
    Encoding { feature: String, reason: String },

    /// A single chart could not be produced, whether while aggregating or drawing.
    #[error("Failed to render chart '{chart}': {source}")]
    Render {
        chart: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Writing the final table to a persistence target failed.
    #[error("Failed to export table to {target}: {reason}")]
    Export { target: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error wrapper.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Spreadsheet writer error wrapper.
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for an imputation failure on a column.
    pub fn imputation(column: impl Into<String>, reason: impl Into<String>) -> Self {
        ProcessingError::Imputation {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a render failure on a chart, keeping the cause as its source.
    pub fn render(
        chart: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ProcessingError::Render {
            chart: chart.into(),
            source: source.into(),
        }
    }

    /// Shorthand for an export failure on a target.
    pub fn export(target: impl Into<String>, reason: impl ToString) -> Self {
        ProcessingError::Export {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    /// Get a stable error code for the driver and JSON output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load(_) => "LOAD_ERROR",
            Self::UninitializedState(_) => "UNINITIALIZED_STATE",
            Self::StageOrder { .. } => "STAGE_ORDER",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::Imputation { .. } => "IMPUTATION_ERROR",
            Self::Encoding { .. } => "ENCODING_ERROR",
            Self::Render { .. } => "RENDER_ERROR",
            Self::Export { .. } => "EXPORT_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Sqlite(_) => "SQLITE_ERROR",
            Self::Xlsx(_) => "XLSX_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

static_assertions::assert_impl_all!(ProcessingError: Send, Sync);

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::io::Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Io(e).with_context(context))
    }
}
