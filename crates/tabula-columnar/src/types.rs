use crate::format::FormatOptions;
use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use std::fmt;
use std::sync::Arc;

/// The fixed type tag of a column's values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Boolean,
    Integer,
    Float,
    Text,
    Timestamp,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Boolean => "boolean",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Text => "text",
            ScalarKind::Timestamp => "timestamp",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ScalarKind::Integer | ScalarKind::Float)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single non-null cell value.
///
/// Floats are wrapped in [`OrderedFloat`] so scalars are `Eq + Hash + Ord` and can be used
/// directly as grouping and sort keys. The derived ordering sorts by kind (declaration order)
/// before value; `Option<Scalar>` places nulls first.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Float(OrderedFloat<f64>),
    Text(Arc<str>),
    Timestamp(NaiveDateTime),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Boolean(_) => ScalarKind::Boolean,
            Scalar::Integer(_) => ScalarKind::Integer,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Text(_) => ScalarKind::Text,
            Scalar::Timestamp(_) => ScalarKind::Timestamp,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value: integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(v) => Some(*v as f64),
            Scalar::Float(v) => Some(v.0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Scalar::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn render(&self, options: &FormatOptions) -> String {
        match self {
            Scalar::Boolean(b) => b.to_string(),
            Scalar::Integer(v) => v.to_string(),
            Scalar::Float(v) => options.render_float(v.0),
            Scalar::Text(s) => s.to_string(),
            Scalar::Timestamp(ts) => ts.format(&options.timestamp_format).to_string(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&FormatOptions::default()))
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(OrderedFloat(value))
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(Arc::from(value))
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(Arc::from(value))
    }
}

impl From<Arc<str>> for Scalar {
    fn from(value: Arc<str>) -> Self {
        Scalar::Text(value)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(value: NaiveDateTime) -> Self {
        Scalar::Timestamp(value)
    }
}

/// A Rust type that maps onto exactly one [`ScalarKind`].
pub trait ScalarType: Clone + Sized + 'static {
    const KIND: ScalarKind;

    /// Extracts the value if `scalar` is of this type's kind.
    fn from_scalar(scalar: &Scalar) -> Option<Self>;

    fn into_scalar(self) -> Scalar;
}

/// A [`ScalarType`] that is also the storage type of its kind's columns.
pub trait NativeType: ScalarType {
    fn slice(data: &ColumnData) -> Option<&[Self]>;

    fn into_data(values: Vec<Self>) -> ColumnData;
}

macro_rules! native_type {
    ($ty:ty, $kind:ident, $scalar:expr, $extract:pat => $value:expr) => {
        impl ScalarType for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_scalar(scalar: &Scalar) -> Option<Self> {
                match scalar {
                    $extract => Some($value),
                    _ => None,
                }
            }

            fn into_scalar(self) -> Scalar {
                $scalar(self)
            }
        }

        impl NativeType for $ty {
            fn slice(data: &ColumnData) -> Option<&[Self]> {
                match data {
                    ColumnData::$kind(values) => Some(values),
                    _ => None,
                }
            }

            fn into_data(values: Vec<Self>) -> ColumnData {
                ColumnData::$kind(values)
            }
        }
    };
}

native_type!(bool, Boolean, Scalar::Boolean, Scalar::Boolean(v) => *v);
native_type!(i64, Integer, Scalar::Integer, Scalar::Integer(v) => *v);
native_type!(f64, Float, Scalar::from, Scalar::Float(v) => v.0);
native_type!(Arc<str>, Text, Scalar::Text, Scalar::Text(v) => v.clone());
native_type!(NaiveDateTime, Timestamp, Scalar::Timestamp, Scalar::Timestamp(v) => *v);

impl ScalarType for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        scalar.as_str().map(str::to_owned)
    }

    fn into_scalar(self) -> Scalar {
        Scalar::from(self)
    }
}

/// Homogeneous storage for one column; slots under a null bit hold the kind's filler value.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Boolean(Vec<bool>),
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<Arc<str>>),
    Timestamp(Vec<NaiveDateTime>),
}

impl ColumnData {
    pub fn with_capacity(kind: ScalarKind, capacity: usize) -> Self {
        match kind {
            ScalarKind::Boolean => ColumnData::Boolean(Vec::with_capacity(capacity)),
            ScalarKind::Integer => ColumnData::Integer(Vec::with_capacity(capacity)),
            ScalarKind::Float => ColumnData::Float(Vec::with_capacity(capacity)),
            ScalarKind::Text => ColumnData::Text(Vec::with_capacity(capacity)),
            ScalarKind::Timestamp => ColumnData::Timestamp(Vec::with_capacity(capacity)),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            ColumnData::Boolean(_) => ScalarKind::Boolean,
            ColumnData::Integer(_) => ScalarKind::Integer,
            ColumnData::Float(_) => ScalarKind::Float,
            ColumnData::Text(_) => ScalarKind::Text,
            ColumnData::Timestamp(_) => ScalarKind::Timestamp,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads slot `index` as a scalar. The caller checks bounds and the null bit.
    pub(crate) fn scalar_at(&self, index: usize) -> Scalar {
        match self {
            ColumnData::Boolean(v) => Scalar::Boolean(v[index]),
            ColumnData::Integer(v) => Scalar::Integer(v[index]),
            ColumnData::Float(v) => Scalar::Float(OrderedFloat(v[index])),
            ColumnData::Text(v) => Scalar::Text(v[index].clone()),
            ColumnData::Timestamp(v) => Scalar::Timestamp(v[index]),
        }
    }

    pub(crate) fn push_filler(&mut self) {
        match self {
            ColumnData::Boolean(v) => v.push(false),
            ColumnData::Integer(v) => v.push(0),
            ColumnData::Float(v) => v.push(0.0),
            ColumnData::Text(v) => v.push(Arc::from("")),
            ColumnData::Timestamp(v) => v.push(NaiveDateTime::MIN),
        }
    }

    /// Appends `value` if it matches this storage's kind; returns `false` otherwise.
    pub(crate) fn push_scalar(&mut self, value: Scalar) -> bool {
        match (self, value) {
            (ColumnData::Boolean(v), Scalar::Boolean(x)) => v.push(x),
            (ColumnData::Integer(v), Scalar::Integer(x)) => v.push(x),
            (ColumnData::Float(v), Scalar::Float(x)) => v.push(x.0),
            (ColumnData::Text(v), Scalar::Text(x)) => v.push(x),
            (ColumnData::Timestamp(v), Scalar::Timestamp(x)) => v.push(x),
            _ => return false,
        }
        true
    }
}
