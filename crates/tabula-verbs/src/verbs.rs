use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tabula_columnar::{
    ColumnBuilder, RowView, Scalar, ScalarKind, ScalarType, Table, TableError, TableResult,
};

type RowFn<'f> = Box<dyn Fn(&RowView<'_>) -> TableResult<Option<Scalar>> + 'f>;

/// Gathers rows whose indices are known to be in range.
fn gather_rows(table: &Table, indices: &[usize]) -> Table {
    table
        .slice_rows(indices)
        .expect("row indices are produced from the table itself")
}

/// Keeps the rows for which `predicate` returns `Ok(true)`, in their original order.
///
/// A predicate error excludes that row and is logged; it never aborts the verb.
pub fn filter<P>(table: &Table, mut predicate: P) -> Table
where
    P: FnMut(&RowView<'_>) -> TableResult<bool>,
{
    let mut keep = Vec::new();
    for row in table.rows() {
        match predicate(&row) {
            Ok(true) => keep.push(row.index()),
            Ok(false) => {}
            Err(err) => log::debug!("filter: excluding row {}: {err}", row.index()),
        }
    }
    gather_rows(table, &keep)
}

/// Projects `names` in the given order. Columns are shared with `table`, not copied.
pub fn select<S: AsRef<str>>(table: &Table, names: &[S]) -> TableResult<Table> {
    let columns = names
        .iter()
        .map(|name| table.column(name.as_ref()).cloned())
        .collect::<TableResult<Vec<_>>>()?;
    Table::from_shared(columns)
}

/// The first `min(n, row_count)` rows.
pub fn head(table: &Table, n: usize) -> Table {
    let rows: Vec<usize> = (0..n.min(table.row_count())).collect();
    gather_rows(table, &rows)
}

/// A derived column for [`mutate`].
pub struct ColumnSpec<'f> {
    name: String,
    kind: ScalarKind,
    selector: RowFn<'f>,
}

impl<'f> ColumnSpec<'f> {
    /// `selector` runs once per row; `Ok(None)` or an error produces a null cell.
    pub fn new<T, F>(name: impl Into<String>, selector: F) -> Self
    where
        T: ScalarType,
        F: Fn(&RowView<'_>) -> TableResult<Option<T>> + 'f,
    {
        Self {
            name: name.into(),
            kind: T::KIND,
            selector: Box::new(move |row: &RowView<'_>| -> TableResult<Option<Scalar>> {
                Ok(selector(row)?.map(T::into_scalar))
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }
}

impl fmt::Debug for ColumnSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Rejects empty and repeated output names before anything is evaluated.
pub(crate) fn check_output_names<'n>(
    verb: &str,
    reserved: impl IntoIterator<Item = &'n str>,
    names: impl IntoIterator<Item = &'n str>,
) -> TableResult<()> {
    let mut seen: HashSet<&str> = reserved.into_iter().collect();
    for name in names {
        if name.is_empty() {
            return Err(TableError::Config(format!("{verb}: output name is empty")));
        }
        if !seen.insert(name) {
            return Err(TableError::Config(format!(
                "{verb}: output name `{name}` is used more than once"
            )));
        }
    }
    Ok(())
}

/// Adds or replaces one column per spec.
///
/// Every spec reads the input table, so specs never observe each other's output. A spec whose
/// name matches an existing column replaces it at the same position; the rest are appended in
/// spec order.
pub fn mutate(table: &Table, specs: Vec<ColumnSpec<'_>>) -> TableResult<Table> {
    check_output_names("mutate", std::iter::empty(), specs.iter().map(|s| s.name()))?;

    let mut columns = table.columns().to_vec();
    for spec in &specs {
        let mut builder = ColumnBuilder::with_capacity(&spec.name, spec.kind, table.row_count());
        for row in table.rows() {
            let value = match (spec.selector)(&row) {
                Ok(value) => value,
                Err(err) => {
                    log::debug!("mutate `{}`: row {} is null: {err}", spec.name, row.index());
                    None
                }
            };
            builder.push(value)?;
        }

        let column = Arc::new(builder.finish());
        match table.column_index(&spec.name) {
            Ok(idx) => columns[idx] = column,
            Err(_) => columns.push(column),
        }
    }
    Table::from_shared(columns)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// One component of an [`arrange`] key.
pub enum SortKey<'f> {
    Column(String),
    Computed(RowFn<'f>),
}

impl<'f> SortKey<'f> {
    pub fn column(name: impl Into<String>) -> Self {
        SortKey::Column(name.into())
    }

    pub fn computed<F>(key: F) -> Self
    where
        F: Fn(&RowView<'_>) -> TableResult<Option<Scalar>> + 'f,
    {
        SortKey::Computed(Box::new(key))
    }

    fn evaluate(&self, table: &Table) -> TableResult<Vec<Option<Scalar>>> {
        match self {
            SortKey::Column(name) => Ok(table.column(name)?.iter().collect()),
            SortKey::Computed(key) => table.rows().map(|row| key(&row)).collect(),
        }
    }
}

impl fmt::Debug for SortKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Column(name) => f.debug_tuple("Column").field(name).finish(),
            SortKey::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Stable sort by the lexicographic tuple of `keys`; nulls sort first.
///
/// Key evaluation errors abort. `Descending` reverses the whole tuple comparison, so rows with
/// equal keys keep their input order either way.
pub fn arrange(table: &Table, keys: &[SortKey<'_>], order: SortOrder) -> TableResult<Table> {
    if keys.is_empty() {
        return Err(TableError::Config("arrange: no sort keys".into()));
    }
    let key_values = keys
        .iter()
        .map(|key| key.evaluate(table))
        .collect::<TableResult<Vec<_>>>()?;

    let mut indices: Vec<usize> = (0..table.row_count()).collect();
    indices.sort_by(|&a, &b| {
        let ord = key_values
            .iter()
            .map(|values| values[a].cmp(&values[b]))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
    table.slice_rows(&indices)
}
