use crate::error::{map_csv_error, CsvError};
use crate::options::{CsvOptions, TextEncoding};
use crate::sniff::{normalize_field, parse_as, KindSniffer};
use csv::ByteRecord;
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tabula_columnar::{ColumnBuilder, ScalarKind, Table};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Reads a CSV stream into a [`Table`], inferring one kind per column.
///
/// Only the leading rows needed to sample `options.sample_rows` values per column are buffered;
/// the rest is streamed straight into the column builders. Fields that do not parse as their
/// column's kind become null.
pub fn read_table<R: Read>(reader: R, options: &CsvOptions) -> Result<Table, CsvError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        // Headers are handled here so row numbers in errors count the header line.
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut record = ByteRecord::new();
    let mut record_index: u64 = 0;

    let has_first = csv_reader
        .read_byte_record(&mut record)
        .map_err(|e| map_csv_error(e, record_index + 1))?;
    if !has_first {
        return Err(CsvError::EmptyInput);
    }
    record_index += 1;

    let first = decode_record(&record, record_index, options.encoding)?;
    let mut header: Vec<String> = Vec::new();
    let mut buffered: Vec<Vec<String>> = Vec::new();
    let mut sniffers: Vec<KindSniffer> = Vec::new();
    if options.has_header {
        header = first;
        sniffers.resize(header.len(), KindSniffer::new());
    } else {
        observe_row(&first, &mut sniffers, options);
        buffered.push(first);
    }

    let saturated = |sniffers: &[KindSniffer]| {
        !sniffers.is_empty() && sniffers.iter().all(|s| s.samples() >= options.sample_rows)
    };
    while !saturated(&sniffers) {
        record.clear();
        match csv_reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                record_index += 1;
                let row = decode_record(&record, record_index, options.encoding)?;
                observe_row(&row, &mut sniffers, options);
                buffered.push(row);
            }
            Err(e) => return Err(map_csv_error(e, record_index + 1)),
        }
    }

    let column_count = header.len().max(sniffers.len()).max(1);
    let kinds: Vec<ScalarKind> = (0..column_count)
        .map(|i| sniffers.get(i).map_or(ScalarKind::Text, KindSniffer::kind))
        .collect();
    let names: Vec<String> = (0..column_count)
        .map(|i| match header.get(i).map(|h| h.trim()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Column{}", i + 1),
        })
        .collect();
    log::debug!(
        "csv: inferred schema {:?}",
        names.iter().zip(&kinds).collect::<Vec<_>>()
    );

    let mut builders: Vec<ColumnBuilder> = names
        .iter()
        .zip(&kinds)
        .map(|(name, kind)| ColumnBuilder::new(name, *kind))
        .collect();

    let first_data_row = if options.has_header { 2 } else { 1 };
    for (offset, row) in buffered.iter().enumerate() {
        let row_number = first_data_row + offset as u64;
        append_row(
            &mut builders,
            row_number,
            |i| row.get(i).map(|s| Cow::Borrowed(s.as_str())),
            row.len(),
            options,
        )?;
    }

    loop {
        record.clear();
        match csv_reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                record_index += 1;
                let mut fields = Vec::with_capacity(record.len());
                for i in 0..record.len() {
                    let raw = record.get(i).unwrap_or(b"");
                    fields.push(decode_field(raw, record_index, i as u64 + 1, options.encoding)?);
                }
                append_row(
                    &mut builders,
                    record_index,
                    |i| fields.get(i).cloned(),
                    record.len(),
                    options,
                )?;
            }
            Err(e) => return Err(map_csv_error(e, record_index + 1)),
        }
    }

    let columns = builders.into_iter().map(ColumnBuilder::finish).collect();
    Ok(Table::new(columns)?)
}

/// Opens `path` and reads it with [`read_table`].
pub fn read_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Table, CsvError> {
    let file = File::open(path)?;
    read_table(BufReader::new(file), options)
}

fn observe_row(row: &[String], sniffers: &mut Vec<KindSniffer>, options: &CsvOptions) {
    if sniffers.len() < row.len() {
        sniffers.resize(row.len(), KindSniffer::new());
    }
    for (sniffer, field) in sniffers.iter_mut().zip(row) {
        if sniffer.samples() >= options.sample_rows {
            continue;
        }
        if let Some(v) = normalize_field(field, options) {
            sniffer.observe(v, options);
        }
    }
}

/// Pushes one cell per builder. Missing trailing fields are null.
///
/// Fields past the sampled columns must be empty (or null tokens); a value there has no column
/// to land in and fails the read.
fn append_row<'a, F>(
    builders: &mut [ColumnBuilder],
    row_number: u64,
    field: F,
    field_count: usize,
    options: &CsvOptions,
) -> Result<(), CsvError>
where
    F: Fn(usize) -> Option<Cow<'a, str>>,
{
    for i in builders.len()..field_count {
        let raw = field(i);
        if let Some(v) = raw.as_deref().and_then(|f| normalize_field(f, options)) {
            return Err(CsvError::Parse {
                row: row_number,
                column: i as u64 + 1,
                reason: format!(
                    "value {v:?} lies beyond the {} column(s) found while sampling",
                    builders.len()
                ),
            });
        }
    }
    for (i, builder) in builders.iter_mut().enumerate() {
        let raw = field(i);
        let Some(v) = raw.as_deref().and_then(|f| normalize_field(f, options)) else {
            builder.push_null();
            continue;
        };
        match parse_as(v, builder.kind(), options) {
            Some(value) => builder.push(Some(value))?,
            None => {
                log::debug!(
                    "csv row {row_number}, column `{}`: {v:?} is not {}; storing null",
                    builder.name(),
                    builder.kind()
                );
                builder.push_null();
            }
        }
    }
    Ok(())
}

fn decode_record(
    record: &ByteRecord,
    row: u64,
    encoding: TextEncoding,
) -> Result<Vec<String>, CsvError> {
    let mut out = Vec::with_capacity(record.len());
    for (idx, field) in record.iter().enumerate() {
        let s = decode_field(field, row, idx as u64 + 1, encoding)?;
        out.push(s.into_owned());
    }
    Ok(out)
}

fn decode_field<'a>(
    field: &'a [u8],
    row: u64,
    column: u64,
    encoding: TextEncoding,
) -> Result<Cow<'a, str>, CsvError> {
    let field = if row == 1 && column == 1 {
        field.strip_prefix(UTF8_BOM).unwrap_or(field)
    } else {
        field
    };

    match encoding {
        TextEncoding::Utf8 => std::str::from_utf8(field)
            .map(Cow::Borrowed)
            .map_err(|e| CsvError::Parse {
                row,
                column,
                reason: format!("invalid UTF-8: {e}"),
            }),
        TextEncoding::Windows1252 => {
            let (cow, _, _) = WINDOWS_1252.decode(field);
            Ok(cow)
        }
        TextEncoding::Auto => match std::str::from_utf8(field) {
            Ok(s) => Ok(Cow::Borrowed(s)),
            Err(_) => {
                log::warn!(
                    "csv row {row}, column {column}: invalid UTF-8, decoding as Windows-1252"
                );
                let (cow, _, _) = WINDOWS_1252.decode(field);
                Ok(cow)
            }
        },
    }
}
