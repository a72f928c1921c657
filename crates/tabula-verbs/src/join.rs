//! Predicate joins.
//!
//! Matching is a nested loop (left rows outer, right rows inner), so any predicate works, not only
//! equality. Output rows are emitted as matched pairs in discovery order, then unmatched right rows
//! in right order when the join kind keeps them.

use std::collections::HashSet;
use std::sync::Arc;
use tabula_columnar::{Bitmap, RowView, Table, TableError, TableResult};

pub const DEFAULT_RIGHT_SUFFIX: &str = "_R";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn from_flags(include_left_unmatched: bool, include_right_unmatched: bool) -> Self {
        match (include_left_unmatched, include_right_unmatched) {
            (false, false) => JoinKind::Inner,
            (true, false) => JoinKind::Left,
            (false, true) => JoinKind::Right,
            (true, true) => JoinKind::Full,
        }
    }

    pub fn includes_left_unmatched(self) -> bool {
        matches!(self, JoinKind::Left | JoinKind::Full)
    }

    pub fn includes_right_unmatched(self) -> bool {
        matches!(self, JoinKind::Right | JoinKind::Full)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinOptions {
    pub kind: JoinKind,
    /// Appended (repeatedly) to right column names that collide with names already taken.
    pub right_suffix: String,
}

impl JoinOptions {
    pub fn new(kind: JoinKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_right_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.right_suffix = suffix.into();
        self
    }
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            kind: JoinKind::Inner,
            right_suffix: DEFAULT_RIGHT_SUFFIX.to_string(),
        }
    }
}

/// Joins `left` and `right` on `predicate(left_row, right_row)`.
///
/// The output has the left columns under their own names, then the right columns, renamed where
/// they collide. A predicate error aborts the join.
pub fn join_with<P>(
    left: &Table,
    right: &Table,
    options: &JoinOptions,
    mut predicate: P,
) -> TableResult<Table>
where
    P: FnMut(&RowView<'_>, &RowView<'_>) -> TableResult<bool>,
{
    if options.right_suffix.is_empty() {
        return Err(TableError::Config("join: right suffix is empty".into()));
    }

    let mut left_rows: Vec<Option<usize>> = Vec::new();
    let mut right_rows: Vec<Option<usize>> = Vec::new();
    let mut right_matched = Bitmap::all_clear(right.row_count());

    for l in left.rows() {
        let mut matched = false;
        for r in right.rows() {
            if predicate(&l, &r)? {
                matched = true;
                right_matched.set(r.index(), true);
                left_rows.push(Some(l.index()));
                right_rows.push(Some(r.index()));
            }
        }
        if !matched && options.kind.includes_left_unmatched() {
            left_rows.push(Some(l.index()));
            right_rows.push(None);
        }
    }
    if options.kind.includes_right_unmatched() {
        for r in 0..right.row_count() {
            if !right_matched.get(r) {
                left_rows.push(None);
                right_rows.push(Some(r));
            }
        }
    }
    log::debug!(
        "join ({:?}): {} x {} rows -> {} rows",
        options.kind,
        left.row_count(),
        right.row_count(),
        left_rows.len()
    );

    let left_part = left.slice_optional_rows(&left_rows)?;
    let right_part = right.slice_optional_rows(&right_rows)?;

    let mut taken: HashSet<String> = left.column_names().into_iter().map(str::to_owned).collect();
    let mut columns = left_part.columns().to_vec();
    for column in right_part.columns() {
        let mut name = column.name().to_string();
        while taken.contains(&name) {
            name.push_str(&options.right_suffix);
        }
        taken.insert(name.clone());
        if name == column.name() {
            columns.push(Arc::clone(column));
        } else {
            columns.push(Arc::new(column.renamed(name)));
        }
    }
    Table::from_shared(columns)
}

pub fn join_by<P>(left: &Table, right: &Table, kind: JoinKind, predicate: P) -> TableResult<Table>
where
    P: FnMut(&RowView<'_>, &RowView<'_>) -> TableResult<bool>,
{
    join_with(left, right, &JoinOptions::new(kind), predicate)
}

pub fn inner_join<P>(left: &Table, right: &Table, predicate: P) -> TableResult<Table>
where
    P: FnMut(&RowView<'_>, &RowView<'_>) -> TableResult<bool>,
{
    join_by(left, right, JoinKind::Inner, predicate)
}

pub fn left_join<P>(left: &Table, right: &Table, predicate: P) -> TableResult<Table>
where
    P: FnMut(&RowView<'_>, &RowView<'_>) -> TableResult<bool>,
{
    join_by(left, right, JoinKind::Left, predicate)
}

pub fn right_join<P>(left: &Table, right: &Table, predicate: P) -> TableResult<Table>
where
    P: FnMut(&RowView<'_>, &RowView<'_>) -> TableResult<bool>,
{
    join_by(left, right, JoinKind::Right, predicate)
}

pub fn full_join<P>(left: &Table, right: &Table, predicate: P) -> TableResult<Table>
where
    P: FnMut(&RowView<'_>, &RowView<'_>) -> TableResult<bool>,
{
    join_by(left, right, JoinKind::Full, predicate)
}

/// Equality on `(left_column, right_column)` pairs. A null on either side never matches.
///
/// Cells compare as scalars, so an integer never equals a float.
pub fn on_columns<L, R>(
    pairs: impl IntoIterator<Item = (L, R)>,
) -> impl Fn(&RowView<'_>, &RowView<'_>) -> TableResult<bool>
where
    L: Into<String>,
    R: Into<String>,
{
    let pairs: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(l, r)| (l.into(), r.into()))
        .collect();
    move |left: &RowView<'_>, right: &RowView<'_>| {
        for (l, r) in &pairs {
            match (left.get(l.as_str())?, right.get(r.as_str())?) {
                (Some(a), Some(b)) if a == b => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}
