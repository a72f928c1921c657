//! Immutable columnar tables for Tabula.
//!
//! This crate focuses on:
//! - Type-erased column storage: one homogeneous array per column plus a null bitmap.
//! - Tables as ordered sets of uniquely named, equal-length columns shared behind `Arc`.
//! - Zero-copy row views with untyped and typed cell access.
//! - Row gathering (`Table::slice_rows`), the primitive every row-reordering verb builds on.

#![forbid(unsafe_code)]

mod bitmap;
mod column;
mod compare;
mod error;
mod format;
mod row;
mod table;
mod types;

pub use crate::bitmap::Bitmap;
pub use crate::column::{Column, ColumnBuilder};
pub use crate::compare::{diff_tables, DiffReport, Difference, DifferenceKind};
pub use crate::error::{TableError, TableResult};
pub use crate::format::FormatOptions;
pub use crate::row::{ColumnRef, RowView};
pub use crate::table::{Rows, Table};
pub use crate::types::{ColumnData, NativeType, Scalar, ScalarKind, ScalarType};

pub use chrono::NaiveDateTime;
pub use ordered_float::OrderedFloat;
