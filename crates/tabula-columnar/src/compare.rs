//! Diagnostic table comparison.
//!
//! The verbs never compare tables; this is for tests and tooling that need to explain *where* two
//! tables diverge instead of a bare `assert_eq!` failure.

use crate::format::FormatOptions;
use crate::table::Table;
use crate::types::Scalar;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DifferenceKind {
    ColumnCount,
    ColumnName,
    ColumnKind,
    RowCount,
    Cell,
}

impl DifferenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DifferenceKind::ColumnCount => "column_count",
            DifferenceKind::ColumnName => "column_name",
            DifferenceKind::ColumnKind => "column_kind",
            DifferenceKind::RowCount => "row_count",
            DifferenceKind::Cell => "cell",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Difference {
    pub kind: DifferenceKind,
    /// `column[row]`, `column`, or empty for table-level differences.
    pub path: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.as_str())?;
        if !self.path.is_empty() {
            write!(f, " at {}", self.path)?;
        }
        if let Some(expected) = &self.expected {
            write!(f, "; expected: {expected}")?;
        }
        if let Some(actual) = &self.actual {
            write!(f, "; actual: {actual}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct DiffReport {
    pub differences: Vec<Difference>,
    /// Set when more differences existed than the report limit.
    pub truncated: bool,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Compares `actual` against `expected`, collecting at most `limit` differences.
///
/// Shape differences (column count, names, kinds, row count) stop the comparison before cells
/// are inspected.
pub fn diff_tables(expected: &Table, actual: &Table, limit: usize) -> DiffReport {
    let mut report = DiffReport::default();
    let push = |report: &mut DiffReport, diff: Difference| {
        if report.differences.len() < limit {
            report.differences.push(diff);
        } else {
            report.truncated = true;
        }
    };

    if expected.column_count() != actual.column_count() {
        push(
            &mut report,
            Difference {
                kind: DifferenceKind::ColumnCount,
                path: String::new(),
                expected: Some(expected.column_count().to_string()),
                actual: Some(actual.column_count().to_string()),
            },
        );
        return report;
    }

    let mut shape_ok = true;
    for (e, a) in expected.columns().iter().zip(actual.columns()) {
        if e.name() != a.name() {
            shape_ok = false;
            push(
                &mut report,
                Difference {
                    kind: DifferenceKind::ColumnName,
                    path: e.name().to_string(),
                    expected: Some(e.name().to_string()),
                    actual: Some(a.name().to_string()),
                },
            );
        } else if e.kind() != a.kind() {
            shape_ok = false;
            push(
                &mut report,
                Difference {
                    kind: DifferenceKind::ColumnKind,
                    path: e.name().to_string(),
                    expected: Some(e.kind().to_string()),
                    actual: Some(a.kind().to_string()),
                },
            );
        }
    }
    if expected.row_count() != actual.row_count() {
        shape_ok = false;
        push(
            &mut report,
            Difference {
                kind: DifferenceKind::RowCount,
                path: String::new(),
                expected: Some(expected.row_count().to_string()),
                actual: Some(actual.row_count().to_string()),
            },
        );
    }
    if !shape_ok {
        return report;
    }

    let options = FormatOptions::default().with_null_text("<null>");
    let render = |v: &Option<Scalar>| match v {
        Some(v) => v.render(&options),
        None => options.null_text.clone(),
    };
    for (e, a) in expected.columns().iter().zip(actual.columns()) {
        for (row, (ev, av)) in e.iter().zip(a.iter()).enumerate() {
            if ev != av {
                push(
                    &mut report,
                    Difference {
                        kind: DifferenceKind::Cell,
                        path: format!("{}[{row}]", e.name()),
                        expected: Some(render(&ev)),
                        actual: Some(render(&av)),
                    },
                );
            }
        }
    }
    report
}
