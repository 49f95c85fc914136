//! Main processing pipeline module.
//!
//! This module provides the `TablePipeline` struct and its builder. The
//! pipeline owns a single passenger table and exposes the ordered stages
//! (impute, engineer, encode) plus read-only analysis.

use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::{ProcessingError, Result};
use crate::loader::{load_csv, normalize_manifest};
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::pipeline::state::{TableStage, TableState};
use crate::quality::DataQualityAnalyzer;
use crate::types::{EncodingSummary, ImputationSummary, MissingValueReport, ProcessingSummary};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// The passenger-table processing pipeline.
///
/// Use [`TablePipeline::builder()`] to create a pipeline with custom
/// configuration.
///
/// # Example
///
/// ```rust,ignore
/// use titanic_processing::{PipelineConfig, TablePipeline};
///
/// let mut pipeline = TablePipeline::builder()
///     .config(PipelineConfig::default())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?;
///
/// pipeline.load("data/titanic.csv")?;
/// pipeline.impute_missing_values()?;
/// pipeline.engineer_features()?;
/// pipeline.encode_categorical_features()?;
/// let table = pipeline.current()?;
/// ```
pub struct TablePipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    state: Option<TableState>,
}

// The pipeline can be handed to a worker thread
static_assertions::assert_impl_all!(TablePipeline: Send);

impl TablePipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> TablePipelineBuilder {
        TablePipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read a manifest from disk and make it the working table.
    ///
    /// Replaces any previously loaded table.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&DataFrame> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            format!("Reading {}", path.as_ref().display()),
        ));
        let df = self.finish_stage(PipelineStage::Loading, load_csv(path), "Manifest read")?;
        Ok(self.install(df))
    }

    /// Validate an in-memory manifest and make it the working table.
    pub fn load_dataframe(&mut self, df: DataFrame) -> Result<&DataFrame> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            "Validating in-memory manifest",
        ));
        let df = self.finish_stage(
            PipelineStage::Loading,
            normalize_manifest(df),
            "Manifest validated",
        )?;
        Ok(self.install(df))
    }

    fn install(&mut self, df: DataFrame) -> &DataFrame {
        info!("Working table: {} rows x {} columns", df.height(), df.width());
        self.state.insert(TableState::new(df)).current()
    }

    /// Per-column missing-value counts of the working table.
    pub fn analyze_missing_values(&self) -> Result<MissingValueReport> {
        let state = self.require_loaded("analyze_missing_values")?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Analysis,
            0.0,
            "Counting missing values...",
        ));

        let report = DataQualityAnalyzer::analyze_missing_values(state.current());
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Analysis,
            1.0,
            format!("{} missing cells found", report.total_missing()),
        ));
        Ok(report)
    }

    /// Fill Age with its median and Embarked with its mode, then add HasCabin.
    pub fn impute_missing_values(&mut self) -> Result<ImputationSummary> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Imputation,
            0.0,
            "Imputing missing values...",
        ));
        info!("Imputing missing values...");

        let result = loaded(&mut self.state, "impute_missing_values").and_then(TableState::impute);
        self.finish_stage(PipelineStage::Imputation, result, "Imputation complete")
    }

    /// Derive Title, AgeGroup and FamilySize. Requires imputation.
    pub fn engineer_features(&mut self) -> Result<()> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::FeatureEngineering,
            0.0,
            "Engineering features...",
        ));
        info!("Engineering features...");

        let sentinel = self.config.title_sentinel.as_str();
        let result =
            loaded(&mut self.state, "engineer_features").and_then(|state| state.engineer(sentinel));
        self.finish_stage(
            PipelineStage::FeatureEngineering,
            result,
            "Feature engineering complete",
        )
    }

    /// Label-encode the configured categorical features. Requires feature engineering.
    pub fn encode_categorical_features(&mut self) -> Result<EncodingSummary> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Encoding,
            0.0,
            "Encoding categorical features...",
        ));
        info!("Encoding categorical features...");

        let features = self.config.categorical_features.as_slice();
        let result = loaded(&mut self.state, "encode_categorical_features")
            .and_then(|state| state.encode(features));
        self.finish_stage(PipelineStage::Encoding, result, "Encoding complete")
    }

    /// The working table.
    pub fn current(&self) -> Result<&DataFrame> {
        Ok(self.require_loaded("current")?.current())
    }

    /// The load-time snapshot.
    pub fn original(&self) -> Result<&DataFrame> {
        Ok(self.require_loaded("original")?.original())
    }

    /// Furthest stage reached, or `None` before load.
    pub fn stage(&self) -> Option<TableStage> {
        self.state.as_ref().map(TableState::stage)
    }

    /// Human-readable log of every committed change.
    pub fn processing_steps(&self) -> &[String] {
        self.state
            .as_ref()
            .map(TableState::processing_steps)
            .unwrap_or_default()
    }

    /// Compare the load-time snapshot with the working table.
    pub fn summary(&self) -> Result<ProcessingSummary> {
        let state = self.require_loaded("summary")?;
        Ok(DataQualityAnalyzer::compare(
            state.original(),
            state.current(),
            state.stage(),
        ))
    }

    /// Consume the pipeline and return the working table.
    pub fn into_table(self) -> Result<DataFrame> {
        self.state
            .map(TableState::into_current)
            .ok_or(ProcessingError::UninitializedState("into_table"))
    }

    /// Report progress if a reporter is configured.
    ///
    /// Public so a driver can report the stages that run outside the pipeline.
    pub fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn require_loaded(&self, operation: &'static str) -> Result<&TableState> {
        self.state
            .as_ref()
            .ok_or(ProcessingError::UninitializedState(operation))
    }

    fn finish_stage<T>(
        &self,
        stage: PipelineStage,
        result: Result<T>,
        message: &str,
    ) -> Result<T> {
        match result {
            Ok(value) => {
                self.report_progress(ProgressUpdate::new(stage, 1.0, message));
                Ok(value)
            }
            Err(e) => {
                error!("{} failed: {}", stage.display_name(), e);
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                Err(e)
            }
        }
    }
}

fn loaded<'a>(
    state: &'a mut Option<TableState>,
    operation: &'static str,
) -> Result<&'a mut TableState> {
    state
        .as_mut()
        .ok_or(ProcessingError::UninitializedState(operation))
}

/// Builder for creating a [`TablePipeline`] instance.
///
/// Use [`TablePipeline::builder()`] to get started.
#[derive(Default)]
pub struct TablePipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(TablePipelineBuilder: Send);

impl TablePipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// Shorthand for [`progress_reporter`](Self::progress_reporter) with a
    /// [`ClosureProgressReporter`].
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<TablePipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(TablePipeline {
            config,
            progress_reporter: self.progress_reporter,
            state: None,
        })
    }
}
