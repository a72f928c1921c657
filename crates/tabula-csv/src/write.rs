use crate::error::{map_csv_error, CsvError};
use crate::options::CsvWriteOptions;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tabula_columnar::Table;

/// Writes `table` as CSV, one record per row, cells rendered with `options.format`.
///
/// A table without columns writes nothing.
pub fn write_table<W: Write>(
    writer: W,
    table: &Table,
    options: &CsvWriteOptions,
) -> Result<(), CsvError> {
    if table.column_count() == 0 {
        return Ok(());
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    if options.include_header {
        csv_writer
            .write_record(table.column_names())
            .map_err(|e| map_csv_error(e, 1))?;
    }

    let format = &options.format;
    let mut fields: Vec<String> = Vec::with_capacity(table.column_count());
    for row in 0..table.row_count() {
        fields.clear();
        for column in table.columns() {
            fields.push(match column.get(row)? {
                Some(value) => value.render(format),
                None => format.null_text.clone(),
            });
        }
        csv_writer
            .write_record(&fields)
            .map_err(|e| map_csv_error(e, row as u64 + 1))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes `table` to it.
pub fn write_path(
    path: impl AsRef<Path>,
    table: &Table,
    options: &CsvWriteOptions,
) -> Result<(), CsvError> {
    let file = File::create(path)?;
    write_table(BufWriter::new(file), table, options)
}
