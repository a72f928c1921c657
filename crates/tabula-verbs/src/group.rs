use crate::aggregate::Aggregate;
use crate::verbs::check_output_names;
use std::collections::HashMap;
use std::fmt;
use tabula_columnar::{
    ColumnBuilder, RowView, Scalar, ScalarKind, ScalarType, Table, TableError, TableResult,
};

type GroupFn<'f> = Box<dyn Fn(&GroupRows<'_>) -> TableResult<Option<Scalar>> + 'f>;

/// One distinct key tuple and the rows that carry it, in index order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    key: Vec<Option<Scalar>>,
    rows: Vec<usize>,
}

impl Group {
    pub fn key(&self) -> &[Option<Scalar>] {
        &self.key
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A partition of a table's rows by key, groups in first-seen order.
#[derive(Clone, Debug)]
pub struct Grouping<'a> {
    table: &'a Table,
    key_names: Vec<String>,
    groups: Vec<Group>,
}

/// Partitions `table` by the values of `names`. Null keys compare equal to each other.
pub fn group_by<'a, S: AsRef<str>>(table: &'a Table, names: &[S]) -> TableResult<Grouping<'a>> {
    if names.is_empty() {
        return Err(TableError::Config("group_by: no key columns".into()));
    }
    let key_names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
    let key_columns = key_names
        .iter()
        .map(|name| table.column(name))
        .collect::<TableResult<Vec<_>>>()?;
    check_output_names("group_by", std::iter::empty(), key_names.iter().map(String::as_str))?;

    let mut index: HashMap<Vec<Option<Scalar>>, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    for row in 0..table.row_count() {
        let key = key_columns
            .iter()
            .map(|column| column.get(row))
            .collect::<TableResult<Vec<_>>>()?;
        match index.get(&key) {
            Some(&group) => groups[group].rows.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    rows: vec![row],
                });
            }
        }
    }

    Ok(Grouping {
        table,
        key_names,
        groups,
    })
}

impl<'a> Grouping<'a> {
    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// One output row per group: the key columns (original kinds) followed by one column per
    /// spec, in spec order.
    ///
    /// Names, column references and parameters are checked before anything is evaluated. After
    /// that, an aggregator that fails or returns `None` produces a null cell.
    pub fn summarise(&self, specs: Vec<AggregateSpec<'_>>) -> TableResult<Table> {
        check_output_names(
            "summarise",
            self.key_names.iter().map(String::as_str),
            specs.iter().map(|s| s.name()),
        )?;

        let mut output_kinds = Vec::with_capacity(specs.len());
        for spec in &specs {
            let kind = match &spec.aggregator {
                Aggregator::Builtin(aggregate) => {
                    aggregate.validate(self.table)?;
                    aggregate.output_kind(self.table)?
                }
                Aggregator::Custom { kind, .. } => *kind,
            };
            output_kinds.push(kind);
        }

        let mut columns = Vec::with_capacity(self.key_names.len() + specs.len());
        for (pos, name) in self.key_names.iter().enumerate() {
            let kind = self.table.column(name)?.kind();
            let mut builder = ColumnBuilder::with_capacity(name, kind, self.groups.len());
            for group in &self.groups {
                builder.push(group.key[pos].clone())?;
            }
            columns.push(builder.finish());
        }

        for (spec, kind) in specs.iter().zip(output_kinds) {
            let mut builder = ColumnBuilder::with_capacity(&spec.name, kind, self.groups.len());
            for group in &self.groups {
                let rows = GroupRows {
                    table: self.table,
                    rows: &group.rows,
                };
                let value = match spec.evaluate(&rows) {
                    Ok(value) => value,
                    Err(err) => {
                        log::debug!(
                            "summarise `{}`: null for group {:?}: {err}",
                            spec.name,
                            group.key
                        );
                        None
                    }
                };
                if let Err(err) = builder.push(value) {
                    log::debug!("summarise `{}`: {err}", spec.name);
                    builder.push_null();
                }
            }
            columns.push(builder.finish());
        }

        Table::new(columns)
    }
}

/// The member rows of one group, in index order.
#[derive(Clone, Copy, Debug)]
pub struct GroupRows<'a> {
    table: &'a Table,
    rows: &'a [usize],
}

impl<'a> GroupRows<'a> {
    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn indices(&self) -> &'a [usize] {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowView<'a>> + 'a {
        let (table, rows) = (self.table, self.rows);
        rows.iter().map(move |&i| RowView::new(table, i))
    }
}

enum Aggregator<'f> {
    Builtin(Aggregate),
    Custom { kind: ScalarKind, eval: GroupFn<'f> },
}

/// A named output column for [`Grouping::summarise`].
pub struct AggregateSpec<'f> {
    name: String,
    aggregator: Aggregator<'f>,
}

impl<'f> AggregateSpec<'f> {
    /// A custom aggregator; `Ok(None)` or an error produces a null cell.
    pub fn new<T, F>(name: impl Into<String>, aggregator: F) -> Self
    where
        T: ScalarType,
        F: Fn(&GroupRows<'_>) -> TableResult<Option<T>> + 'f,
    {
        Self {
            name: name.into(),
            aggregator: Aggregator::Custom {
                kind: T::KIND,
                eval: Box::new(move |rows: &GroupRows<'_>| -> TableResult<Option<Scalar>> {
                    Ok(aggregator(rows)?.map(T::into_scalar))
                }),
            },
        }
    }

    pub fn builtin(name: impl Into<String>, aggregate: Aggregate) -> Self {
        Self {
            name: name.into(),
            aggregator: Aggregator::Builtin(aggregate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, rows: &GroupRows<'_>) -> TableResult<Option<Scalar>> {
        match &self.aggregator {
            Aggregator::Builtin(aggregate) => aggregate.evaluate(rows),
            Aggregator::Custom { eval, .. } => eval(rows),
        }
    }
}

impl fmt::Debug for AggregateSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("AggregateSpec");
        s.field("name", &self.name);
        match &self.aggregator {
            Aggregator::Builtin(aggregate) => s.field("aggregate", aggregate),
            Aggregator::Custom { kind, .. } => s.field("custom", kind),
        };
        s.finish()
    }
}
