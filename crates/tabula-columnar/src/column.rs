#![forbid(unsafe_code)]

use crate::bitmap::Bitmap;
use crate::error::{TableError, TableResult};
use crate::types::{ColumnData, NativeType, Scalar, ScalarKind, ScalarType};
use chrono::NaiveDateTime;
use std::sync::Arc;

/// One named, homogeneous array of values plus a parallel null bitmap.
///
/// Columns are never mutated after construction; tables share them behind `Arc`.
#[derive(Clone, Debug)]
pub struct Column {
    name: String,
    data: ColumnData,
    nulls: Bitmap,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData, nulls: Bitmap) -> TableResult<Self> {
        let name = name.into();
        if data.len() != nulls.len() {
            return Err(TableError::LengthMismatch {
                column: name,
                values: data.len(),
                nulls: nulls.len(),
            });
        }
        Ok(Self { name, data, nulls })
    }

    /// A column without nulls.
    pub fn from_values<T: NativeType>(name: impl Into<String>, values: Vec<T>) -> Self {
        let nulls = Bitmap::all_clear(values.len());
        Self {
            name: name.into(),
            data: T::into_data(values),
            nulls,
        }
    }

    /// A column where `None` entries are null.
    pub fn from_options<T, I>(name: impl Into<String>, values: I) -> Self
    where
        T: ScalarType,
        I: IntoIterator<Item = Option<T>>,
    {
        let values = values.into_iter();
        let mut builder = ColumnBuilder::with_capacity(name, T::KIND, values.size_hint().0);
        for value in values {
            builder.push_typed(value);
        }
        builder.finish()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScalarKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.nulls.count_ones()
    }

    pub fn is_null(&self, index: usize) -> TableResult<bool> {
        self.check_index(index)?;
        Ok(self.nulls.get(index))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Same data under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: self.data.clone(),
            nulls: self.nulls.clone(),
        }
    }

    pub fn get(&self, index: usize) -> TableResult<Option<Scalar>> {
        self.check_index(index)?;
        if self.nulls.get(index) {
            return Ok(None);
        }
        Ok(Some(self.data.scalar_at(index)))
    }

    pub fn get_typed<T: ScalarType>(&self, index: usize) -> TableResult<Option<T>> {
        self.check_kind(T::KIND)?;
        Ok(self.get(index)?.and_then(|v| T::from_scalar(&v)))
    }

    /// Raw typed storage, including filler values under null bits.
    pub fn values<T: NativeType>(&self) -> TableResult<&[T]> {
        T::slice(&self.data).ok_or_else(|| self.kind_error(T::KIND))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<Scalar>> + '_ {
        (0..self.len()).map(move |i| {
            if self.nulls.get(i) {
                None
            } else {
                Some(self.data.scalar_at(i))
            }
        })
    }

    /// Gathers cells by index into a new column of the same name and kind.
    ///
    /// Indices may repeat or skip rows; each must be in range.
    pub fn take(&self, indices: &[usize]) -> TableResult<Self> {
        self.gather(indices.iter().map(|&i| Some(i)))
    }

    /// Like [`Column::take`], but a `None` index produces a null cell.
    pub fn take_optional(&self, indices: &[Option<usize>]) -> TableResult<Self> {
        self.gather(indices.iter().copied())
    }

    fn gather<I>(&self, indices: I) -> TableResult<Self>
    where
        I: ExactSizeIterator<Item = Option<usize>>,
    {
        let mut nulls = Bitmap::with_capacity(indices.len());
        let src = &self.nulls;
        let data = match &self.data {
            ColumnData::Boolean(v) => {
                ColumnData::Boolean(gather(v, src, indices, false, &mut nulls)?)
            }
            ColumnData::Integer(v) => ColumnData::Integer(gather(v, src, indices, 0, &mut nulls)?),
            ColumnData::Float(v) => ColumnData::Float(gather(v, src, indices, 0.0, &mut nulls)?),
            ColumnData::Text(v) => {
                ColumnData::Text(gather(v, src, indices, Arc::from(""), &mut nulls)?)
            }
            ColumnData::Timestamp(v) => {
                ColumnData::Timestamp(gather(v, src, indices, NaiveDateTime::MIN, &mut nulls)?)
            }
        };
        Ok(Self {
            name: self.name.clone(),
            data,
            nulls,
        })
    }

    fn check_index(&self, index: usize) -> TableResult<()> {
        if index >= self.len() {
            return Err(TableError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_kind(&self, expected: ScalarKind) -> TableResult<()> {
        if self.kind() == expected {
            Ok(())
        } else {
            Err(self.kind_error(expected))
        }
    }

    fn kind_error(&self, expected: ScalarKind) -> TableError {
        TableError::TypeMismatch {
            column: self.name.clone(),
            expected,
            actual: self.kind(),
        }
    }
}

fn gather<T: Clone>(
    values: &[T],
    source_nulls: &Bitmap,
    indices: impl Iterator<Item = Option<usize>>,
    filler: T,
    nulls: &mut Bitmap,
) -> TableResult<Vec<T>> {
    let mut out = Vec::with_capacity(indices.size_hint().0);
    for index in indices {
        match index {
            Some(i) => {
                let Some(value) = values.get(i) else {
                    return Err(TableError::IndexOutOfRange {
                        index: i,
                        len: values.len(),
                    });
                };
                out.push(value.clone());
                nulls.push(source_nulls.get(i));
            }
            None => {
                out.push(filler.clone());
                nulls.push(true);
            }
        }
    }
    Ok(out)
}

/// Structural equality over name, kind, length and cells; null matches only null. Storage
/// slots under null bits are not compared.
impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind() == other.kind()
            && self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

/// Appends cells one at a time into a column of a fixed kind.
#[derive(Clone, Debug)]
pub struct ColumnBuilder {
    name: String,
    data: ColumnData,
    nulls: Bitmap,
}

impl ColumnBuilder {
    pub fn new(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::with_capacity(name, kind, 0)
    }

    pub fn with_capacity(name: impl Into<String>, kind: ScalarKind, capacity: usize) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::with_capacity(kind, capacity),
            nulls: Bitmap::with_capacity(capacity),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScalarKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&mut self, value: Option<Scalar>) -> TableResult<()> {
        let Some(value) = value else {
            self.push_null();
            return Ok(());
        };
        let actual = value.kind();
        if !self.data.push_scalar(value) {
            return Err(TableError::TypeMismatch {
                column: self.name.clone(),
                expected: self.kind(),
                actual,
            });
        }
        self.nulls.push(false);
        Ok(())
    }

    pub fn push_null(&mut self) {
        self.data.push_filler();
        self.nulls.push(true);
    }

    pub(crate) fn push_typed<T: ScalarType>(&mut self, value: Option<T>) {
        debug_assert_eq!(T::KIND, self.kind());
        match value {
            Some(v) => {
                if self.data.push_scalar(v.into_scalar()) {
                    self.nulls.push(false);
                } else {
                    self.push_null();
                }
            }
            None => self.push_null(),
        }
    }

    pub fn finish(self) -> Column {
        Column {
            name: self.name,
            data: self.data,
            nulls: self.nulls,
        }
    }
}
