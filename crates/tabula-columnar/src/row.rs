use crate::error::TableResult;
use crate::format::FormatOptions;
use crate::table::Table;
use crate::types::{Scalar, ScalarType};
use std::fmt;

/// Resolves a column reference (a name or a positional index) against a table.
pub trait ColumnRef {
    fn resolve(&self, table: &Table) -> TableResult<usize>;
}

impl ColumnRef for str {
    fn resolve(&self, table: &Table) -> TableResult<usize> {
        table.column_index(self)
    }
}

impl ColumnRef for String {
    fn resolve(&self, table: &Table) -> TableResult<usize> {
        table.column_index(self)
    }
}

impl ColumnRef for usize {
    fn resolve(&self, table: &Table) -> TableResult<usize> {
        table.column_at(*self)?;
        Ok(*self)
    }
}

impl<T: ColumnRef + ?Sized> ColumnRef for &T {
    fn resolve(&self, table: &Table) -> TableResult<usize> {
        (**self).resolve(table)
    }
}

/// A non-owning cursor at one row of a [`Table`].
#[derive(Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> RowView<'a> {
    /// Out-of-range indices are reported by the accessors, not here.
    pub fn new(table: &'a Table, index: usize) -> Self {
        Self { table, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn get(&self, column: impl ColumnRef) -> TableResult<Option<Scalar>> {
        let idx = column.resolve(self.table)?;
        self.table.cell(idx, self.index)
    }

    /// Reads a cell as `T`; fails with `TypeMismatch` when the column is of another kind.
    pub fn get_typed<T: ScalarType>(&self, column: impl ColumnRef) -> TableResult<Option<T>> {
        let idx = column.resolve(self.table)?;
        self.table.column_at(idx)?.get_typed(self.index)
    }

    pub fn is_null(&self, column: impl ColumnRef) -> TableResult<bool> {
        let idx = column.resolve(self.table)?;
        self.table.column_at(idx)?.is_null(self.index)
    }

    pub fn values(&self) -> impl Iterator<Item = Option<Scalar>> + 'a {
        let table = self.table;
        let index = self.index;
        table
            .columns()
            .iter()
            .map(move |c| c.get(index).ok().flatten())
    }

    /// Joins every cell with `options.delimiter`, writing nulls as `options.null_text`.
    pub fn render(&self, options: &FormatOptions) -> String {
        let cells: Vec<String> = self
            .values()
            .map(|v| match v {
                Some(v) => v.render(options),
                None => options.null_text.clone(),
            })
            .collect();
        cells.join(&options.delimiter)
    }
}

impl fmt::Debug for RowView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowView")
            .field("index", &self.index)
            .field("values", &self.values().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for RowView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&FormatOptions::default()))
    }
}
