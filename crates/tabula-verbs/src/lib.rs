//! Table verbs over [`tabula_columnar::Table`].
//!
//! Every verb is a pure function from input tables to a new table; inputs are never modified.
//! Columns a verb leaves untouched are shared with the output.
//!
//! Per-row failures inside `filter` (row excluded), `mutate` and `summarise` (null cell) are
//! recovered and logged through the `log` facade at `debug`. Structural problems (unknown
//! columns, bad configuration, duplicate names) abort with a [`tabula_columnar::TableError`].

#![forbid(unsafe_code)]

mod aggregate;
mod group;
mod join;
pub mod stats;
mod verbs;

pub use crate::aggregate::Aggregate;
pub use crate::group::{group_by, AggregateSpec, Group, GroupRows, Grouping};
pub use crate::join::{
    full_join, inner_join, join_by, join_with, left_join, on_columns, right_join, JoinKind,
    JoinOptions, DEFAULT_RIGHT_SUFFIX,
};
pub use crate::verbs::{arrange, filter, head, mutate, select, ColumnSpec, SortKey, SortOrder};

use tabula_columnar::{RowView, Table, TableResult};

/// Method-call form of the verbs, so pipelines read left to right.
pub trait TableVerbs {
    fn filter<P>(&self, predicate: P) -> Table
    where
        P: FnMut(&RowView<'_>) -> TableResult<bool>;

    fn select<S: AsRef<str>>(&self, names: &[S]) -> TableResult<Table>;

    fn mutate(&self, specs: Vec<ColumnSpec<'_>>) -> TableResult<Table>;

    fn arrange(&self, keys: &[SortKey<'_>], order: SortOrder) -> TableResult<Table>;

    fn head(&self, n: usize) -> Table;

    fn group_by<S: AsRef<str>>(&self, names: &[S]) -> TableResult<Grouping<'_>>;

    fn join<P>(&self, right: &Table, options: &JoinOptions, predicate: P) -> TableResult<Table>
    where
        P: FnMut(&RowView<'_>, &RowView<'_>) -> TableResult<bool>;
}

impl TableVerbs for Table {
    fn filter<P>(&self, predicate: P) -> Table
    where
        P: FnMut(&RowView<'_>) -> TableResult<bool>,
    {
        verbs::filter(self, predicate)
    }

    fn select<S: AsRef<str>>(&self, names: &[S]) -> TableResult<Table> {
        verbs::select(self, names)
    }

    fn mutate(&self, specs: Vec<ColumnSpec<'_>>) -> TableResult<Table> {
        verbs::mutate(self, specs)
    }

    fn arrange(&self, keys: &[SortKey<'_>], order: SortOrder) -> TableResult<Table> {
        verbs::arrange(self, keys, order)
    }

    fn head(&self, n: usize) -> Table {
        verbs::head(self, n)
    }

    fn group_by<S: AsRef<str>>(&self, names: &[S]) -> TableResult<Grouping<'_>> {
        group::group_by(self, names)
    }

    fn join<P>(&self, right: &Table, options: &JoinOptions, predicate: P) -> TableResult<Table>
    where
        P: FnMut(&RowView<'_>, &RowView<'_>) -> TableResult<bool>,
    {
        join::join_with(self, right, options, predicate)
    }
}
