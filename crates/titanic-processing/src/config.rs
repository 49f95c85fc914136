//! Configuration types for the Titanic processing pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use crate::error::ResultExt;
use crate::schema::{EMBARKED, SEX, TITLE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the processing pipeline and its terminal consumers.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use titanic_processing::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .table_name("passengers")
///     .histogram_bins(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Categorical columns that receive a `<Feature>_Encoded` sibling.
    /// Names absent from the table are skipped.
    /// Default: Sex, Embarked, Title
    pub categorical_features: Vec<String>,

    /// Title assigned when no honorific can be parsed from a name.
    /// Default: "Unknown"
    pub title_sentinel: String,

    /// Table name used inside the SQLite file. Existing content is replaced.
    /// Default: "titanic"
    pub table_name: String,

    /// Number of bins for the age distribution histogram.
    /// Default: 30
    pub histogram_bins: usize,

    /// Directory receiving the SQLite, spreadsheet and CSV exports.
    /// Default: "data"
    pub output_dir: PathBuf,

    /// Directory receiving the chart files. Created if absent.
    /// Default: "visualizations"
    pub visualizations_dir: PathBuf,

    /// File name of the SQLite export inside `output_dir`.
    /// Default: "titanic.db"
    pub sqlite_file: String,

    /// File name of the spreadsheet export inside `output_dir`.
    /// Default: "titanic_processed.xlsx"
    pub excel_file: String,

    /// Optional file name of a CSV copy of the final table.
    /// Default: None
    pub csv_file: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            categorical_features: default_categorical_features(),
            title_sentinel: "Unknown".to_string(),
            table_name: "titanic".to_string(),
            histogram_bins: 30,
            output_dir: PathBuf::from("data"),
            visualizations_dir: PathBuf::from("visualizations"),
            sqlite_file: "titanic.db".to_string(),
            excel_file: "titanic_processed.xlsx".to_string(),
            csv_file: None,
        }
    }
}

fn default_categorical_features() -> Vec<String> {
    [SEX, EMBARKED, TITLE].iter().map(|s| s.to_string()).collect()
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults. The result is validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .context(format!("reading config file {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| crate::error::ProcessingError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Full path of the SQLite export.
    pub fn sqlite_path(&self) -> PathBuf {
        self.output_dir.join(&self.sqlite_file)
    }

    /// Full path of the spreadsheet export.
    pub fn excel_path(&self) -> PathBuf {
        self.output_dir.join(&self.excel_file)
    }

    /// Full path of the optional CSV export.
    pub fn csv_path(&self) -> Option<PathBuf> {
        self.csv_file.as_ref().map(|name| self.output_dir.join(name))
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.table_name.is_empty() {
            return Err(ConfigValidationError::EmptyField("table_name"));
        }

        if !self
            .table_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigValidationError::InvalidTableName(
                self.table_name.clone(),
            ));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidHistogramBins(
                self.histogram_bins,
            ));
        }

        if self.title_sentinel.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField("title_sentinel"));
        }

        if self.categorical_features.is_empty() {
            return Err(ConfigValidationError::EmptyField("categorical_features"));
        }

        for (field, name) in [
            ("sqlite_file", &self.sqlite_file),
            ("excel_file", &self.excel_file),
        ] {
            if name.is_empty() {
                return Err(ConfigValidationError::EmptyField(field));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Configuration field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("Invalid table name '{0}' (only ASCII letters, digits and '_' are allowed)")]
    InvalidTableName(String),

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidHistogramBins(usize),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    categorical_features: Option<Vec<String>>,
    title_sentinel: Option<String>,
    table_name: Option<String>,
    histogram_bins: Option<usize>,
    output_dir: Option<PathBuf>,
    visualizations_dir: Option<PathBuf>,
    sqlite_file: Option<String>,
    excel_file: Option<String>,
    csv_file: Option<String>,
}

impl PipelineConfigBuilder {
    /// Start from an existing configuration, e.g. one loaded from JSON.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self {
            categorical_features: Some(config.categorical_features),
            title_sentinel: Some(config.title_sentinel),
            table_name: Some(config.table_name),
            histogram_bins: Some(config.histogram_bins),
            output_dir: Some(config.output_dir),
            visualizations_dir: Some(config.visualizations_dir),
            sqlite_file: Some(config.sqlite_file),
            excel_file: Some(config.excel_file),
            csv_file: config.csv_file,
        }
    }

    /// Set the categorical features to encode.
    pub fn categorical_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    /// Set the title used when a name carries no parsable honorific.
    pub fn title_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.title_sentinel = Some(sentinel.into());
        self
    }

    /// Set the SQLite table name.
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Set the number of age histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the directory for exported tables.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the directory for chart files.
    pub fn visualizations_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.visualizations_dir = Some(path.into());
        self
    }

    /// Set the SQLite file name.
    pub fn sqlite_file(mut self, name: impl Into<String>) -> Self {
        self.sqlite_file = Some(name.into());
        self
    }

    /// Set the spreadsheet file name.
    pub fn excel_file(mut self, name: impl Into<String>) -> Self {
        self.excel_file = Some(name.into());
        self
    }

    /// Also write a CSV copy of the final table under this file name.
    pub fn csv_file(mut self, name: impl Into<String>) -> Self {
        self.csv_file = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            categorical_features: self
                .categorical_features
                .unwrap_or(defaults.categorical_features),
            title_sentinel: self.title_sentinel.unwrap_or(defaults.title_sentinel),
            table_name: self.table_name.unwrap_or(defaults.table_name),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            visualizations_dir: self
                .visualizations_dir
                .unwrap_or(defaults.visualizations_dir),
            sqlite_file: self.sqlite_file.unwrap_or(defaults.sqlite_file),
            excel_file: self.excel_file.unwrap_or(defaults.excel_file),
            csv_file: self.csv_file,
        };

        config.validate()?;
        Ok(config)
    }
}
