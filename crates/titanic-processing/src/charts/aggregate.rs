//! Aggregates behind each chart, computed without any drawing.

use crate::error::{ProcessingError, Result, ResultExt};
use crate::schema::{AGE, FAMILY_SIZE, PCLASS, SEX, SURVIVED};
use crate::types::{AgeHistogram, CorrelationMatrix, GroupRate};
use polars::prelude::*;

/// Pearson correlation between every pair of `fields`.
///
/// Each pair uses only the rows where both values are present. A pair with
/// fewer than two such rows, or with a constant side, is NaN.
pub fn correlation_matrix(df: &DataFrame, fields: &[&str]) -> Result<CorrelationMatrix> {
    let columns: Vec<Vec<Option<f64>>> = fields
        .iter()
        .map(|field| float_values(df, field))
        .collect::<Result<_>>()?;

    let values = columns
        .iter()
        .map(|x| columns.iter().map(|y| pearson(x, y)).collect())
        .collect();

    Ok(CorrelationMatrix {
        labels: fields.iter().map(|f| f.to_string()).collect(),
        values,
    })
}

fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

/// Mean of `Survived` per distinct value of `key`, ascending by key.
///
/// Rows with a missing key are left out.
pub fn survival_by(df: &DataFrame, key: &str) -> Result<Vec<GroupRate>> {
    for name in [key, SURVIVED] {
        if df.column(name).is_err() {
            return Err(ProcessingError::ColumnNotFound(name.to_string()));
        }
    }

    let grouped = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([
            col(SURVIVED).cast(DataType::Float64).mean().alias("rate"),
            len().alias("passengers"),
        ])
        .sort([key], SortMultipleOptions::default())
        .collect()
        .context(format!("grouping survival rate by '{}'", key))?;

    let labels = grouped.column(key)?.cast(&DataType::String)?;
    let rates = grouped.column("rate")?.cast(&DataType::Float64)?;
    let passengers = grouped.column("passengers")?.cast(&DataType::UInt64)?;

    let groups = labels
        .str()?
        .into_iter()
        .zip(rates.f64()?.into_iter())
        .zip(passengers.u64()?.into_iter())
        .map(|((label, rate), count)| GroupRate {
            label: label.unwrap_or_default().to_string(),
            passengers: count.unwrap_or(0) as usize,
            rate,
        })
        .collect();

    Ok(groups)
}

/// Survival rate per passenger class (1, 2, 3).
pub fn survival_by_class(df: &DataFrame) -> Result<Vec<GroupRate>> {
    survival_by(df, PCLASS)
}

/// Survival rate per family size, smallest first.
pub fn survival_by_family_size(df: &DataFrame) -> Result<Vec<GroupRate>> {
    survival_by(df, FAMILY_SIZE)
}

/// Survival rate per sex.
pub fn survival_by_sex(df: &DataFrame) -> Result<Vec<GroupRate>> {
    survival_by(df, SEX)
}

/// Equal-width histogram of `Age`, split by survival outcome.
///
/// Bins span the observed minimum to maximum; the last bin includes the
/// maximum. Rows with a missing age or outcome are left out.
pub fn age_histogram(df: &DataFrame, bins: usize) -> Result<AgeHistogram> {
    if bins == 0 {
        return Err(ProcessingError::InvalidConfig(
            "histogram needs at least one bin".to_string(),
        ));
    }

    let ages = float_values(df, AGE)?;
    let survived = float_values(df, SURVIVED)?;
    let observations: Vec<(f64, bool)> = ages
        .into_iter()
        .zip(survived)
        .filter_map(|(age, outcome)| Some((age?, outcome? >= 1.0)))
        .filter(|(age, _)| age.is_finite())
        .collect();

    let (mut lo, mut hi) = observations
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (age, _)| {
            (lo.min(*age), hi.max(*age))
        });
    if observations.is_empty() {
        (lo, hi) = (0.0, 1.0);
    } else if lo == hi {
        hi = lo + 1.0;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut perished = vec![0usize; bins];
    let mut survivors = vec![0usize; bins];
    for (age, outcome) in observations {
        let idx = (((age - lo) / width).floor() as usize).min(bins - 1);
        if outcome {
            survivors[idx] += 1;
        } else {
            perished[idx] += 1;
        }
    }

    Ok(AgeHistogram {
        edges,
        perished,
        survived: survivors,
    })
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| ProcessingError::ColumnNotFound(name.to_string()))?;
    let floats = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(floats.f64()?.into_iter().collect())
}
