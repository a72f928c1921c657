use crate::group::{AggregateSpec, GroupRows};
use crate::stats;
use std::collections::HashSet;
use tabula_columnar::{Column, Scalar, ScalarKind, Table, TableError, TableResult};

/// Built-in reductions over one group. Nulls in the source column(s) are skipped.
#[derive(Clone, Debug, PartialEq)]
pub enum Aggregate {
    /// Rows in the group, nulls included.
    Count,
    CountNonNull(String),
    Sum(String),
    Average(String),
    Min(String),
    Max(String),
    /// Population variance.
    Variance(String),
    /// Population standard deviation.
    StdDev(String),
    Median(String),
    /// Nearest-rank percentile with `p` in `[0, 1]`.
    Percentile { column: String, p: f64 },
    Mode(String),
    CountDistinct(String),
    Range(String),
    WeightedAverage { value: String, weight: String },
    Correlation { x: String, y: String },
    First(String),
    Last(String),
}

impl Aggregate {
    pub fn sum(column: impl Into<String>) -> Self {
        Aggregate::Sum(column.into())
    }

    pub fn average(column: impl Into<String>) -> Self {
        Aggregate::Average(column.into())
    }

    pub fn min(column: impl Into<String>) -> Self {
        Aggregate::Min(column.into())
    }

    pub fn max(column: impl Into<String>) -> Self {
        Aggregate::Max(column.into())
    }

    pub fn median(column: impl Into<String>) -> Self {
        Aggregate::Median(column.into())
    }

    pub fn percentile(column: impl Into<String>, p: f64) -> Self {
        Aggregate::Percentile {
            column: column.into(),
            p,
        }
    }

    pub fn weighted_average(value: impl Into<String>, weight: impl Into<String>) -> Self {
        Aggregate::WeightedAverage {
            value: value.into(),
            weight: weight.into(),
        }
    }

    pub fn correlation(x: impl Into<String>, y: impl Into<String>) -> Self {
        Aggregate::Correlation {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Wraps this aggregate as a [`AggregateSpec`] producing the column `name`.
    pub fn named(self, name: impl Into<String>) -> AggregateSpec<'static> {
        AggregateSpec::builtin(name, self)
    }

    /// Source columns read by this aggregate.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Aggregate::Count => Vec::new(),
            Aggregate::CountNonNull(c)
            | Aggregate::Sum(c)
            | Aggregate::Average(c)
            | Aggregate::Min(c)
            | Aggregate::Max(c)
            | Aggregate::Variance(c)
            | Aggregate::StdDev(c)
            | Aggregate::Median(c)
            | Aggregate::Mode(c)
            | Aggregate::CountDistinct(c)
            | Aggregate::Range(c)
            | Aggregate::First(c)
            | Aggregate::Last(c)
            | Aggregate::Percentile { column: c, .. } => vec![c.as_str()],
            Aggregate::WeightedAverage { value, weight } => vec![value.as_str(), weight.as_str()],
            Aggregate::Correlation { x, y } => vec![x.as_str(), y.as_str()],
        }
    }

    /// Checks column references and parameters against `table` before any group is evaluated.
    pub fn validate(&self, table: &Table) -> TableResult<()> {
        for column in self.columns() {
            table.column(column)?;
        }
        if let Aggregate::Percentile { p, .. } = self {
            if !(0.0..=1.0).contains(p) {
                return Err(TableError::Config(format!(
                    "percentile must be within [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }

    /// Kind of the output column. Value-preserving aggregates take the source column's kind.
    pub fn output_kind(&self, table: &Table) -> TableResult<ScalarKind> {
        Ok(match self {
            Aggregate::Count | Aggregate::CountNonNull(_) | Aggregate::CountDistinct(_) => {
                ScalarKind::Integer
            }
            Aggregate::Min(c)
            | Aggregate::Max(c)
            | Aggregate::Mode(c)
            | Aggregate::First(c)
            | Aggregate::Last(c) => table.column(c)?.kind(),
            _ => ScalarKind::Float,
        })
    }

    pub fn evaluate(&self, rows: &GroupRows<'_>) -> TableResult<Option<Scalar>> {
        let float = |v: f64| -> TableResult<Option<Scalar>> { Ok(Some(Scalar::from(v))) };
        match self {
            Aggregate::Count => Ok(Some(Scalar::Integer(rows.len() as i64))),
            Aggregate::CountNonNull(c) => {
                Ok(Some(Scalar::Integer(non_null(rows, c)?.len() as i64)))
            }
            Aggregate::Sum(c) => float(stats::sum(&numeric(rows, c)?)?),
            Aggregate::Average(c) => float(stats::mean(&numeric(rows, c)?)?),
            Aggregate::Min(c) => extreme(rows, c, "min", |values| values.min()),
            Aggregate::Max(c) => extreme(rows, c, "max", |values| values.max()),
            Aggregate::Variance(c) => float(stats::variance(&numeric(rows, c)?)?),
            Aggregate::StdDev(c) => float(stats::std_dev(&numeric(rows, c)?)?),
            Aggregate::Median(c) => float(stats::median(&numeric(rows, c)?)?),
            Aggregate::Percentile { column, p } => {
                float(stats::percentile(&numeric(rows, column)?, *p)?)
            }
            Aggregate::Mode(c) => Ok(stats::mode(non_null(rows, c)?)),
            Aggregate::CountDistinct(c) => {
                let distinct: HashSet<Scalar> = non_null(rows, c)?.into_iter().collect();
                Ok(Some(Scalar::Integer(distinct.len() as i64)))
            }
            Aggregate::Range(c) => float(stats::range(&numeric(rows, c)?)?),
            Aggregate::WeightedAverage { value, weight } => {
                float(stats::weighted_mean(&numeric_pairs(rows, value, weight)?)?)
            }
            Aggregate::Correlation { x, y } => {
                float(stats::correlation(&numeric_pairs(rows, x, y)?)?)
            }
            Aggregate::First(c) => Ok(non_null(rows, c)?.into_iter().next()),
            Aggregate::Last(c) => Ok(non_null(rows, c)?.into_iter().next_back()),
        }
    }
}

fn non_null(rows: &GroupRows<'_>, column: &str) -> TableResult<Vec<Scalar>> {
    let column = rows.table().column(column)?;
    let mut out = Vec::with_capacity(rows.len());
    for &idx in rows.indices() {
        if let Some(value) = column.get(idx)? {
            out.push(value);
        }
    }
    Ok(out)
}

fn numeric_column<'t>(rows: &GroupRows<'t>, column: &str) -> TableResult<&'t Column> {
    let column: &'t Column = rows.table().column(column)?;
    if !column.kind().is_numeric() {
        return Err(TableError::TypeMismatch {
            column: column.name().to_string(),
            expected: ScalarKind::Float,
            actual: column.kind(),
        });
    }
    Ok(column)
}

fn numeric(rows: &GroupRows<'_>, column: &str) -> TableResult<Vec<f64>> {
    let column = numeric_column(rows, column)?;
    let mut out = Vec::with_capacity(rows.len());
    for &idx in rows.indices() {
        if let Some(value) = column.get(idx)?.and_then(|v| v.as_f64()) {
            out.push(value);
        }
    }
    Ok(out)
}

/// `(a, b)` for rows where both cells are non-null.
fn numeric_pairs(rows: &GroupRows<'_>, a: &str, b: &str) -> TableResult<Vec<(f64, f64)>> {
    let a = numeric_column(rows, a)?;
    let b = numeric_column(rows, b)?;
    let mut out = Vec::with_capacity(rows.len());
    for &idx in rows.indices() {
        let x = a.get(idx)?.and_then(|v| v.as_f64());
        let y = b.get(idx)?.and_then(|v| v.as_f64());
        if let (Some(x), Some(y)) = (x, y) {
            out.push((x, y));
        }
    }
    Ok(out)
}

fn extreme<F>(
    rows: &GroupRows<'_>,
    column: &str,
    what: &str,
    pick: F,
) -> TableResult<Option<Scalar>>
where
    F: FnOnce(std::vec::IntoIter<Scalar>) -> Option<Scalar>,
{
    match pick(non_null(rows, column)?.into_iter()) {
        Some(value) => Ok(Some(value)),
        None => Err(TableError::Aggregation(format!("{what} of an empty group"))),
    }
}
