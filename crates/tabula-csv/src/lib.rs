//! CSV import and export for tabula tables.
//!
//! Import streams the input through the `csv` crate, samples the leading rows to pick one
//! [`tabula_columnar::ScalarKind`] per column (Boolean, then Integer, Float, Timestamp, falling
//! back to Text), and parses the rest with those kinds. Export renders cells with an explicit
//! [`tabula_columnar::FormatOptions`].

#![forbid(unsafe_code)]

mod error;
mod options;
mod read;
mod sniff;
mod write;

pub use crate::error::CsvError;
pub use crate::options::{CsvOptions, CsvWriteOptions, TextEncoding, DEFAULT_TIMESTAMP_FORMATS};
pub use crate::read::{read_path, read_table};
pub use crate::write::{write_path, write_table};
