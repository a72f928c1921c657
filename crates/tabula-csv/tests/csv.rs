use pretty_assertions::assert_eq;
use std::sync::Arc;
use tabula_columnar::{Column, FormatOptions, NaiveDateTime, Scalar, ScalarKind, Table, TableError};
use tabula_csv::{
    read_path, read_table, write_path, write_table, CsvError, CsvOptions, CsvWriteOptions,
    TextEncoding,
};

fn read(input: &str) -> Table {
    read_table(input.as_bytes(), &CsvOptions::default()).unwrap()
}

fn cells(table: &Table, name: &str) -> Vec<Option<Scalar>> {
    table.column(name).unwrap().iter().collect()
}

#[test]
fn sniffs_one_kind_per_column() {
    let table = read(
        "flag,bits,count,price,when,note\n\
         yes,1,10,1.5,2024-01-02,a\n\
         no,0,-3,2,2024-01-03 04:05:06,b\n\
         true,1,7,3.25,2024-01-04,12\n",
    );
    assert_eq!(
        table.schema(),
        vec![
            ("flag", ScalarKind::Boolean),
            ("bits", ScalarKind::Integer),
            ("count", ScalarKind::Integer),
            ("price", ScalarKind::Float),
            ("when", ScalarKind::Timestamp),
            ("note", ScalarKind::Text),
        ]
    );
    assert_eq!(
        cells(&table, "when")[1],
        Some(Scalar::Timestamp(
            NaiveDateTime::parse_from_str("2024-01-03 04:05:06", "%Y-%m-%d %H:%M:%S").unwrap()
        ))
    );
    assert_eq!(
        cells(&table, "note"),
        vec![
            Some(Scalar::from("a")),
            Some(Scalar::from("b")),
            Some(Scalar::from("12"))
        ]
    );
}

#[test]
fn empty_fields_and_null_tokens_are_null() {
    let options = CsvOptions::default().with_null_tokens(["NA"]);
    let table = read_table("a,b\n1,NA\n,x\n3,\n".as_bytes(), &options).unwrap();
    assert_eq!(table.column("a").unwrap().kind(), ScalarKind::Integer);
    assert_eq!(
        cells(&table, "a"),
        vec![Some(Scalar::from(1)), None, Some(Scalar::from(3))]
    );
    assert_eq!(cells(&table, "b"), vec![None, Some(Scalar::from("x")), None]);
}

#[test]
fn values_after_the_sample_that_do_not_parse_become_null() {
    let options = CsvOptions {
        sample_rows: 2,
        ..CsvOptions::default()
    };
    let table = read_table("n\n1\n2\nthree\n4\n".as_bytes(), &options).unwrap();
    assert_eq!(table.column("n").unwrap().kind(), ScalarKind::Integer);
    assert_eq!(
        cells(&table, "n"),
        vec![
            Some(Scalar::from(1)),
            Some(Scalar::from(2)),
            None,
            Some(Scalar::from(4))
        ]
    );
}

#[test]
fn null_fields_do_not_count_toward_the_sample() {
    let options = CsvOptions {
        sample_rows: 1,
        ..CsvOptions::default()
    };
    let table = read_table("v\n\n\nx\n".as_bytes(), &options).unwrap();
    assert_eq!(table.column("v").unwrap().kind(), ScalarKind::Text);

    let table = read_table("v,w\n,1\n2.5,2\n".as_bytes(), &options).unwrap();
    assert_eq!(table.column("v").unwrap().kind(), ScalarKind::Float);
}

#[test]
fn headers_are_padded_and_short_rows_are_null() {
    let table = read("a,,c\n1,2,3,4\n5\n");
    assert_eq!(table.column_names(), vec!["a", "Column2", "c", "Column4"]);
    assert_eq!(
        cells(&table, "c"),
        vec![Some(Scalar::from(3)), None]
    );

    let options = CsvOptions {
        has_header: false,
        ..CsvOptions::default()
    };
    let table = read_table("x,1\ny,2\n".as_bytes(), &options).unwrap();
    assert_eq!(table.column_names(), vec!["Column1", "Column2"]);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn duplicate_headers_are_a_table_error() {
    let err = read_table("a,a\n1,2\n".as_bytes(), &CsvOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        CsvError::Table(TableError::DuplicateColumn(ref name)) if name == "a"
    ));
}

#[test]
fn empty_input_is_rejected() {
    let err = read_table("".as_bytes(), &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, CsvError::EmptyInput));
}

#[test]
fn header_only_input_has_text_columns() {
    let table = read("a,b\n");
    assert_eq!(table.row_count(), 0);
    assert_eq!(
        table.schema(),
        vec![("a", ScalarKind::Text), ("b", ScalarKind::Text)]
    );
}

#[test]
fn bom_is_stripped_and_encodings_apply() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"name\ncaf\xE9\n");

    let table = read_table(bytes.as_slice(), &CsvOptions::default()).unwrap();
    assert_eq!(table.column_names(), vec!["name"]);
    assert_eq!(cells(&table, "name"), vec![Some(Scalar::from("café"))]);

    let strict = CsvOptions {
        encoding: TextEncoding::Utf8,
        ..CsvOptions::default()
    };
    let err = read_table(bytes.as_slice(), &strict).unwrap_err();
    assert!(matches!(err, CsvError::Parse { row: 2, column: 1, .. }));
}

#[test]
fn semicolon_delimiter_with_comma_decimals() {
    let options = CsvOptions {
        delimiter: b';',
        decimal_separator: ',',
        ..CsvOptions::default()
    };
    let table = read_table("x;y\n1,5;a\n2,25;b\n".as_bytes(), &options).unwrap();
    assert_eq!(
        cells(&table, "x"),
        vec![Some(Scalar::from(1.5)), Some(Scalar::from(2.25))]
    );
}

fn mixed() -> Table {
    let ts = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
    Table::new(vec![
        Column::from_options::<Arc<str>, _>(
            "name",
            vec![Some("Ann".into()), Some("Bo, Jr.".into()), None],
        ),
        Column::from_options("age", vec![Some(40i64), None, Some(20)]),
        Column::from_options("score", vec![Some(1.5f64), Some(-2.25), None]),
        Column::from_options("active", vec![Some(true), Some(false), None]),
        Column::from_options(
            "seen",
            vec![Some(ts("2024-01-02 03:04:05")), None, Some(ts("2023-12-31 23:59:59"))],
        ),
    ])
    .unwrap()
}

#[test]
fn write_then_read_round_trips() {
    let table = mixed();
    let mut out = Vec::new();
    write_table(&mut out, &table, &CsvWriteOptions::default()).unwrap();

    let text = String::from_utf8(out.clone()).unwrap();
    assert_eq!(
        text.lines().next().unwrap(),
        "name,age,score,active,seen"
    );
    assert_eq!(text.lines().nth(2).unwrap(), "\"Bo, Jr.\",,-2.25,false,");

    let back = read_table(out.as_slice(), &CsvOptions::default()).unwrap();
    assert_eq!(back, table);
}

#[test]
fn writer_honors_null_text_and_delimiter() {
    let table = mixed();
    let options = CsvWriteOptions {
        delimiter: b'\t',
        include_header: false,
        format: FormatOptions::default().with_null_text("NULL"),
    };
    let mut out = Vec::new();
    write_table(&mut out, &table, &options).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert_eq!(
        text.lines().nth(2).unwrap(),
        "NULL\t20\tNULL\tNULL\t2023-12-31 23:59:59"
    );
}

#[test]
fn path_round_trip() {
    let path = std::env::temp_dir().join(format!("tabula-csv-{}.csv", std::process::id()));
    let table = mixed();
    write_path(&path, &table, &CsvWriteOptions::default()).unwrap();
    let back = read_path(&path, &CsvOptions::default()).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(back, table);
}

#[test]
fn sub_second_timestamps_round_trip() {
    let ts = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap();
    let table = Table::new(vec![Column::from_values(
        "at",
        vec![ts("2024-01-02 03:04:05.250"), ts("2024-01-02 03:04:06")],
    )])
    .unwrap();

    let mut out = Vec::new();
    write_table(&mut out, &table, &CsvWriteOptions::default()).unwrap();
    let text = String::from_utf8(out.clone()).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec!["at", "2024-01-02 03:04:05.250", "2024-01-02 03:04:06"]
    );

    let back = read_table(out.as_slice(), &CsvOptions::default()).unwrap();
    assert_eq!(back, table);
}

#[test]
fn values_past_the_sampled_columns_fail_the_read() {
    let options = CsvOptions {
        sample_rows: 1,
        ..CsvOptions::default()
    };

    let table = read_table("a,b\n1,2\n3,4,\n".as_bytes(), &options).unwrap();
    assert_eq!(table.column_names(), vec!["a", "b"]);
    assert_eq!(
        cells(&table, "b"),
        vec![Some(Scalar::from(2)), Some(Scalar::from(4))]
    );

    let err = read_table("a,b\n1,2\n3,4,\n5,6,7\n".as_bytes(), &options).unwrap_err();
    assert!(matches!(err, CsvError::Parse { row: 4, column: 3, .. }));
}
