//! Numeric reductions behind the built-in aggregators.
//!
//! Every function fails with [`TableError::Aggregation`] when its input is empty or the result is
//! undefined, instead of returning `NaN`.

use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::hash::Hash;
use tabula_columnar::{TableError, TableResult};

fn require_non_empty(values: &[f64], what: &str) -> TableResult<()> {
    if values.is_empty() {
        return Err(TableError::Aggregation(format!("{what} of an empty group")));
    }
    Ok(())
}

pub fn sum(values: &[f64]) -> TableResult<f64> {
    require_non_empty(values, "sum")?;
    Ok(values.iter().sum())
}

pub fn mean(values: &[f64]) -> TableResult<f64> {
    require_non_empty(values, "average")?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `N`).
pub fn variance(values: &[f64]) -> TableResult<f64> {
    require_non_empty(values, "variance")?;
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let squares: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Ok(squares / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> TableResult<f64> {
    Ok(variance(values)?.sqrt())
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by_key(|v| OrderedFloat(*v));
    out
}

/// Middle value after sorting; the mean of the two middle values when `N` is even.
pub fn median(values: &[f64]) -> TableResult<f64> {
    require_non_empty(values, "median")?;
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Nearest-rank percentile: `rank = clamp(ceil(p * N), 1, N)` into the ascending order.
pub fn percentile(values: &[f64], p: f64) -> TableResult<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(TableError::Config(format!(
            "percentile must be within [0, 1], got {p}"
        )));
    }
    require_non_empty(values, "percentile")?;
    let sorted = sorted(values);
    let n = sorted.len();
    let rank = ((p * n as f64).ceil() as usize).clamp(1, n);
    Ok(sorted[rank - 1])
}

pub fn range(values: &[f64]) -> TableResult<f64> {
    require_non_empty(values, "range")?;
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    Ok(max - min)
}

/// `Σ(value · weight) / Σ weight` over `(value, weight)` pairs.
pub fn weighted_mean(pairs: &[(f64, f64)]) -> TableResult<f64> {
    if pairs.is_empty() {
        return Err(TableError::Aggregation(
            "weighted average of an empty group".into(),
        ));
    }
    let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
    if total_weight == 0.0 {
        return Err(TableError::Aggregation(
            "weighted average with zero total weight".into(),
        ));
    }
    let weighted: f64 = pairs.iter().map(|(v, w)| v * w).sum();
    Ok(weighted / total_weight)
}

/// Pearson correlation of `(x, y)` pairs, computed in two passes (means, then co-moments).
pub fn correlation(pairs: &[(f64, f64)]) -> TableResult<f64> {
    if pairs.is_empty() {
        return Err(TableError::Aggregation(
            "correlation of an empty group".into(),
        ));
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Err(TableError::Aggregation(
            "correlation is undefined when a variable has zero variance".into(),
        ));
    }
    Ok(covariance / (var_x * var_y).sqrt())
}

/// Most frequent value. On a tie, the value that was seen first wins.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Hash + Eq + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut first_seen: Vec<T> = Vec::new();
    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for value in first_seen {
        let count = counts.get(&value).copied().unwrap_or(0);
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
