//! Working state of a processing session.

use crate::encoding::encode_features;
use crate::error::{ProcessingError, Result};
use crate::features::FeatureEngineer;
use crate::imputers::StatisticalImputer;
use crate::schema::{AGE, EMBARKED, HAS_CABIN};
use crate::types::{EncodingSummary, ImputationSummary};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Furthest stage the working table has reached.
///
/// Stages only move forward; re-running an earlier stage keeps the
/// furthest stage reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStage {
    Loaded,
    Imputed,
    FeaturesEngineered,
    Encoded,
}

impl TableStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Imputed => "imputed",
            Self::FeaturesEngineered => "features_engineered",
            Self::Encoded => "encoded",
        }
    }

    /// The operation that advances a table to this stage.
    pub fn reached_by(&self) -> &'static str {
        match self {
            Self::Loaded => "load",
            Self::Imputed => "impute_missing_values",
            Self::FeaturesEngineered => "engineer_features",
            Self::Encoded => "encode_categorical_features",
        }
    }
}

impl fmt::Display for TableStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The working table, its load-time snapshot and the stage reached.
///
/// Every mutation runs on a copy of `current` and is committed only when
/// the whole stage succeeds, so a failed stage leaves the state as it was.
#[derive(Debug, Clone)]
pub struct TableState {
    current: DataFrame,
    original: DataFrame,
    stage: TableStage,
    processing_steps: Vec<String>,
}

impl TableState {
    pub(crate) fn new(df: DataFrame) -> Self {
        Self {
            original: df.clone(),
            current: df,
            stage: TableStage::Loaded,
            processing_steps: Vec::new(),
        }
    }

    pub fn current(&self) -> &DataFrame {
        &self.current
    }

    pub fn original(&self) -> &DataFrame {
        &self.original
    }

    pub fn stage(&self) -> TableStage {
        self.stage
    }

    pub fn processing_steps(&self) -> &[String] {
        &self.processing_steps
    }

    pub(crate) fn into_current(self) -> DataFrame {
        self.current
    }

    fn require(&self, required: TableStage, operation: &'static str) -> Result<()> {
        if self.stage < required {
            return Err(ProcessingError::StageOrder {
                operation,
                required: required.reached_by(),
                current: self.stage.as_str(),
            });
        }
        Ok(())
    }

    fn commit(&mut self, df: DataFrame, steps: Vec<String>, reached: TableStage) {
        self.current = df;
        self.processing_steps.extend(steps);
        self.stage = self.stage.max(reached);
    }

    /// Fill Age (median) and Embarked (mode), then derive HasCabin.
    pub(crate) fn impute(&mut self) -> Result<ImputationSummary> {
        let mut df = self.current.clone();
        let mut steps = Vec::new();

        let age = StatisticalImputer::apply_numeric_median(&mut df, AGE, &mut steps)?;
        let embarked = StatisticalImputer::apply_mode_imputation(&mut df, EMBARKED, &mut steps)?;
        let cabins_present = FeatureEngineer::add_has_cabin(&mut df)?;
        steps.push(format!(
            "Added '{}' ({} of {} rows have a cabin)",
            HAS_CABIN,
            cabins_present,
            df.height()
        ));

        for column in [AGE, EMBARKED] {
            let remaining = df.column(column)?.null_count();
            if remaining > 0 {
                return Err(ProcessingError::imputation(
                    column,
                    format!("{} values still missing after imputation", remaining),
                ));
            }
        }

        debug!(
            "Imputation filled {} Age and {} Embarked values",
            age.filled, embarked.filled
        );
        self.commit(df, steps, TableStage::Imputed);

        Ok(ImputationSummary {
            age_filled: age.filled,
            age_median: age.value,
            embarked_filled: embarked.filled,
            embarked_mode: embarked.value,
            cabins_present,
        })
    }

    /// Derive Title, AgeGroup and FamilySize.
    pub(crate) fn engineer(&mut self, title_sentinel: &str) -> Result<()> {
        self.require(TableStage::Imputed, "engineer_features")?;

        let mut df = self.current.clone();
        let mut steps = Vec::new();

        let fallback = FeatureEngineer::add_title(&mut df, title_sentinel)?;
        steps.push(format!(
            "Extracted 'Title' from 'Name' ({} rows set to '{}')",
            fallback, title_sentinel
        ));
        FeatureEngineer::add_age_group(&mut df)?;
        steps.push("Binned 'Age' into 'AgeGroup'".to_string());
        FeatureEngineer::add_family_size(&mut df)?;
        steps.push("Added 'FamilySize' = SibSp + Parch + 1".to_string());

        self.commit(df, steps, TableStage::FeaturesEngineered);
        Ok(())
    }

    /// Label-encode the given categorical features.
    pub(crate) fn encode(&mut self, features: &[String]) -> Result<EncodingSummary> {
        self.require(TableStage::FeaturesEngineered, "encode_categorical_features")?;

        let mut df = self.current.clone();
        let mut steps = Vec::new();
        let summary = encode_features(&mut df, features, &mut steps)?;

        self.commit(df, steps, TableStage::Encoded);
        Ok(summary)
    }
}
