#![forbid(unsafe_code)]

use crate::column::Column;
use crate::error::{TableError, TableResult};
use crate::row::RowView;
use crate::types::{Scalar, ScalarKind};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

/// An immutable, ordered set of uniquely named, equal-length columns.
///
/// Columns are held behind `Arc` so verbs that leave a column untouched can share it with
/// their output instead of copying it.
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: Vec<Arc<Column>>,
    column_index: HashMap<String, usize>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> TableResult<Self> {
        Self::from_shared(columns.into_iter().map(Arc::new).collect())
    }

    pub fn from_shared(columns: Vec<Arc<Column>>) -> TableResult<Self> {
        let rows = columns.first().map_or(0, |c| c.len());
        let mut column_index = HashMap::with_capacity(columns.len());

        for (idx, column) in columns.iter().enumerate() {
            if column.len() != rows {
                return Err(TableError::ColumnLengthMismatch {
                    column: column.name().to_string(),
                    expected: rows,
                    actual: column.len(),
                });
            }
            if column_index.insert(column.name().to_string(), idx).is_some() {
                return Err(TableError::DuplicateColumn(column.name().to_string()));
            }
        }

        Ok(Self {
            columns,
            column_index,
            rows,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Arc<Column>] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// `(name, kind)` for every column, in order.
    pub fn schema(&self) -> Vec<(&str, ScalarKind)> {
        self.columns.iter().map(|c| (c.name(), c.kind())).collect()
    }

    pub fn column_index(&self, name: &str) -> TableResult<usize> {
        self.column_index
            .get(name)
            .copied()
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    pub fn column(&self, name: &str) -> TableResult<&Arc<Column>> {
        let idx = self.column_index(name)?;
        Ok(&self.columns[idx])
    }

    pub fn column_at(&self, index: usize) -> TableResult<&Arc<Column>> {
        self.columns.get(index).ok_or(TableError::IndexOutOfRange {
            index,
            len: self.columns.len(),
        })
    }

    /// Reads one cell by column index and row index.
    pub fn cell(&self, column: usize, row: usize) -> TableResult<Option<Scalar>> {
        self.column_at(column)?.get(row)
    }

    pub fn row(&self, index: usize) -> TableResult<RowView<'_>> {
        if index >= self.rows {
            return Err(TableError::IndexOutOfRange {
                index,
                len: self.rows,
            });
        }
        Ok(RowView::new(self, index))
    }

    /// Iterates row views over `0..row_count()`. Call again to restart.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            range: 0..self.rows,
        }
    }

    /// Materializes the rows at `indices` (in that order) into a new table.
    ///
    /// Indices need not be a permutation: rows may repeat or be skipped.
    pub fn slice_rows(&self, indices: &[usize]) -> TableResult<Table> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.take(indices).map(Arc::new))
            .collect::<TableResult<Vec<_>>>()?;
        Ok(self.with_columns(columns, indices.len()))
    }

    /// Materializes possibly-absent rows; `None` yields an all-null row.
    pub fn slice_optional_rows(&self, indices: &[Option<usize>]) -> TableResult<Table> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.take_optional(indices).map(Arc::new))
            .collect::<TableResult<Vec<_>>>()?;
        Ok(self.with_columns(columns, indices.len()))
    }

    /// Same schema, new column data. A table without columns always has zero rows.
    fn with_columns(&self, columns: Vec<Arc<Column>>, rows: usize) -> Table {
        let rows = if columns.is_empty() { 0 } else { rows };
        Self {
            columns,
            column_index: self.column_index.clone(),
            rows,
        }
    }
}

/// Tables are equal when they have the same column names in the same order and every column is
/// structurally equal.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(other.columns.iter())
                .all(|(a, b)| a == b)
    }
}

/// Iterator over the rows of a [`Table`].
#[derive(Clone, Debug)]
pub struct Rows<'a> {
    table: &'a Table,
    range: Range<usize>,
}

impl<'a> Iterator for Rows<'a> {
    type Item = RowView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(|i| RowView::new(self.table, i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for Rows<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.range.next_back().map(|i| RowView::new(self.table, i))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl<'a> IntoIterator for &'a Table {
    type Item = RowView<'a>;
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}
