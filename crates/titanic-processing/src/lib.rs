//! Titanic Manifest Processing Library
//!
//! A batch preprocessing pipeline for the Titanic passenger manifest, built with Rust and Polars.
//!
//! # Overview
//!
//! The pipeline takes the raw manifest through a fixed sequence of stages:
//!
//! - **Loading**: CSV ingestion with column checks and normalized dtypes
//! - **Missing Value Analysis**: Per-column missing counts and percentages
//! - **Imputation**: Median `Age`, most frequent `Embarked`, and a `HasCabin` flag
//! - **Feature Engineering**: `Title`, `AgeGroup` and `FamilySize`
//! - **Encoding**: Deterministic integer codes for categorical features
//! - **Charts**: Five summary charts written as SVG files
//! - **Export**: SQLite table, `.xlsx` workbook and an optional CSV copy
//!
//! Every mutating stage checks the stage the table has reached, so running
//! them out of order is an error instead of silently skipped work.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use titanic_processing::{ChartRenderer, TablePipeline, configured_exporters, export_all};
//!
//! let mut pipeline = TablePipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?;
//!
//! pipeline.load("data/titanic.csv")?;
//! let report = pipeline.analyze_missing_values()?;
//! println!("{}", report);
//!
//! pipeline.impute_missing_values()?;
//! pipeline.engineer_features()?;
//! pipeline.encode_categorical_features()?;
//!
//! let config = pipeline.config().clone();
//! let table = pipeline.current()?;
//! let charts = ChartRenderer::from_config(&config).render_all(table, &config.visualizations_dir);
//! let outcomes = export_all(table, &configured_exporters(&config));
//! ```
//!
//! # Configuration
//!
//! Use [`PipelineConfig`] to change output locations and stage parameters:
//!
//! ```rust,ignore
//! use titanic_processing::PipelineConfig;
//!
//! let config = PipelineConfig::builder()
//!     .categorical_features(["Sex", "Embarked", "Title", "AgeGroup"])
//!     .table_name("passengers")        // SQLite table, replaced on every run
//!     .histogram_bins(20)
//!     .output_dir("out")
//!     .csv_file("titanic_processed.csv")
//!     .build()?;
//! ```
//!
//! # Progress Reporting
//!
//! ```rust,ignore
//! use titanic_processing::{ProgressReporter, ProgressUpdate, TablePipeline};
//! use std::sync::Arc;
//!
//! struct Logger;
//!
//! impl ProgressReporter for Logger {
//!     fn report(&self, update: ProgressUpdate) {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     }
//! }
//!
//! let pipeline = TablePipeline::builder()
//!     .progress_reporter(Arc::new(Logger))
//!     .build()?;
//! ```

pub mod charts;
pub mod config;
pub mod encoding;
pub mod error;
pub mod export;
pub mod features;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod quality;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use charts::{Chart, ChartFailure, ChartRenderer, RenderReport};
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use encoding::{LabelEncoder, encode_features};
pub use error::{ProcessingError, Result as ProcessingResult, ResultExt};
pub use export::{
    CsvExporter, ExcelExporter, ExportOutcome, SqliteExporter, TableExporter,
    configured_exporters, export_all,
};
pub use features::{FeatureEngineer, extract_title};
pub use imputers::{Fill, StatisticalImputer};
pub use loader::load_csv;
pub use pipeline::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate, TablePipeline,
    TablePipelineBuilder, TableStage, TableState,
};
pub use quality::DataQualityAnalyzer;
pub use schema::AgeGroup;
pub use types::{
    AgeHistogram, ColumnMissing, CorrelationMatrix, EncodingSummary, FeatureEncoding, GroupRate,
    ImputationSummary, MissingValueReport, ProcessingSummary,
};
