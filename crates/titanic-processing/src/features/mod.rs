//! Feature derivation from repaired passenger columns.
//!
//! Each derivation appends (or replaces) one column:
//! - `HasCabin`: 1 when a cabin is recorded, else 0
//! - `Title`: honorific parsed from `Name`
//! - `AgeGroup`: ordinal bucket of the imputed `Age`
//! - `FamilySize`: `SibSp + Parch + 1`

mod title;

pub use title::extract_title;

use crate::error::{ProcessingError, Result};
use crate::schema::{
    AGE, AGE_GROUP, AgeGroup, CABIN, FAMILY_SIZE, HAS_CABIN, NAME, PARCH, SIBSP, TITLE,
};
use polars::prelude::*;
use tracing::debug;

/// Derives analytic columns on a DataFrame in place.
pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Add `HasCabin` from the presence of `Cabin`. Returns the number of rows with a cabin.
    ///
    /// Reads presence only, so it is valid before or after any imputation.
    pub fn add_has_cabin(df: &mut DataFrame) -> Result<usize> {
        let cabin = required_column(df, CABIN)?;
        let cabins = cabin.len() - cabin.null_count();

        let has_cabin = cabin
            .is_not_null()
            .into_series()
            .cast(&DataType::Int64)?
            .with_name(HAS_CABIN.into());
        df.with_column(has_cabin)?;

        debug!("{} of {} passengers have a cabin", cabins, df.height());
        Ok(cabins)
    }

    /// Add `Title` parsed from `Name`; unparsable or missing names get `sentinel`.
    ///
    /// Returns how many rows received the sentinel.
    pub fn add_title(df: &mut DataFrame, sentinel: &str) -> Result<usize> {
        let names = required_column(df, NAME)?.cast(&DataType::String)?;

        let mut fallback = 0usize;
        let titles: StringChunked = names
            .str()?
            .into_iter()
            .map(|name| match name.and_then(extract_title) {
                Some(title) => Some(title),
                None => {
                    fallback += 1;
                    Some(sentinel)
                }
            })
            .collect();

        df.with_column(titles.with_name(TITLE.into()).into_series())?;

        if fallback > 0 {
            debug!("{} names had no parsable title, used '{}'", fallback, sentinel);
        }
        Ok(fallback)
    }

    /// Add `AgeGroup` from `Age`.
    ///
    /// `Age` must already be fully imputed; binning a missing age would leave
    /// an undefined bucket.
    pub fn add_age_group(df: &mut DataFrame) -> Result<()> {
        let age = required_column(df, AGE)?;
        if age.null_count() > 0 {
            return Err(ProcessingError::StageOrder {
                operation: "add_age_group",
                required: "Age imputation",
                current: "Age still has missing values",
            });
        }

        let age = age.cast(&DataType::Float64)?;
        let groups: StringChunked = age
            .f64()?
            .into_iter()
            .map(|value| value.and_then(AgeGroup::from_age).map(|g| g.label()))
            .collect();

        df.with_column(groups.with_name(AGE_GROUP.into()).into_series())?;
        Ok(())
    }

    /// Add `FamilySize = SibSp + Parch + 1`.
    pub fn add_family_size(df: &mut DataFrame) -> Result<()> {
        let sibsp = required_column(df, SIBSP)?.cast(&DataType::Int64)?;
        let parch = required_column(df, PARCH)?.cast(&DataType::Int64)?;

        let family: Int64Chunked = sibsp
            .i64()?
            .into_iter()
            .zip(parch.i64()?.into_iter())
            .map(|(s, p)| match (s, p) {
                (Some(s), Some(p)) => Some(s + p + 1),
                _ => None,
            })
            .collect();

        df.with_column(family.with_name(FAMILY_SIZE.into()).into_series())?;
        Ok(())
    }
}

fn required_column(df: &DataFrame, name: &str) -> Result<Series> {
    df.column(name)
        .map(|col| col.as_materialized_series().clone())
        .map_err(|_| ProcessingError::ColumnNotFound(name.to_string()))
}
