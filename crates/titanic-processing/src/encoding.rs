//! Label encoding of categorical features.
//!
//! Each feature's distinct values are sorted byte-wise and numbered from 0,
//! so the same input always produces the same codes. The encoded column is
//! written next to the source column, never in its place.

use crate::error::{ProcessingError, Result};
use crate::schema::encoded_column_name;
use crate::types::{EncodingSummary, FeatureEncoding};
use crate::utils::sorted_distinct;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Text used for a missing value before codes are assigned.
pub const MISSING_LABEL: &str = "Missing";

/// Sorted-class label encoder for one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the classes of a column.
    pub fn fit(series: &Series) -> Result<Self> {
        let labels = as_labels(series)?;
        Ok(Self {
            classes: sorted_distinct(&labels),
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Map every value of `series` to its code.
    ///
    /// A value not seen during [`fit`](Self::fit) is an error.
    pub fn transform(&self, series: &Series) -> Result<Int64Chunked> {
        let lookup: HashMap<&str, i64> = self
            .classes
            .iter()
            .enumerate()
            .map(|(code, class)| (class.as_str(), code as i64))
            .collect();

        let labels = as_labels(series)?;
        labels
            .into_iter()
            .map(|label| {
                let label = label.unwrap_or(MISSING_LABEL);
                lookup.get(label).copied().map(Some).ok_or_else(|| {
                    ProcessingError::Encoding {
                        feature: series.name().to_string(),
                        reason: format!("value '{}' was not seen when fitting", label),
                    }
                })
            })
            .collect()
    }
}

/// Column values as text, with nulls rendered as [`MISSING_LABEL`].
fn as_labels(series: &Series) -> Result<StringChunked> {
    let strings = series.cast(&DataType::String)?;
    Ok(strings
        .str()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(MISSING_LABEL)))
        .collect())
}

/// Append a `<feature>_Encoded` column for every listed feature present in `df`.
///
/// Features absent from the table are recorded in
/// [`EncodingSummary::skipped`]. An existing encoded column is replaced.
pub fn encode_features<S: AsRef<str>>(
    df: &mut DataFrame,
    features: &[S],
    processing_steps: &mut Vec<String>,
) -> Result<EncodingSummary> {
    let mut summary = EncodingSummary::default();

    for feature in features.iter().map(AsRef::as_ref) {
        let Ok(column) = df.column(feature) else {
            debug!("Feature '{}' not in table, skipping encoding", feature);
            summary.skipped.push(feature.to_string());
            continue;
        };
        let series = column.as_materialized_series().clone();

        let encoder = LabelEncoder::fit(&series)?;
        let encoded_name = encoded_column_name(feature);
        let codes = encoder
            .transform(&series)?
            .with_name(encoded_name.as_str().into())
            .into_series();
        df.with_column(codes)?;

        debug!(
            "Encoded '{}' into {} classes: {:?}",
            feature,
            encoder.classes().len(),
            encoder.classes()
        );
        processing_steps.push(format!(
            "Encoded '{}' as '{}' ({} classes)",
            feature,
            encoded_name,
            encoder.classes().len()
        ));

        summary.encoded.push(FeatureEncoding {
            feature: feature.to_string(),
            encoded_column: encoded_name,
            classes: encoder.classes,
        });
    }

    Ok(summary)
}
