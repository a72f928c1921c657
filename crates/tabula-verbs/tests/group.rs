use pretty_assertions::assert_eq;
use std::sync::Arc;
use tabula_columnar::{Column, Scalar, ScalarKind, Table, TableError};
use tabula_verbs::{group_by, Aggregate, AggregateSpec, GroupRows};

fn sales() -> Table {
    Table::new(vec![
        Column::from_options::<Arc<str>, _>(
            "region",
            vec![
                Some("east".into()),
                Some("west".into()),
                None,
                Some("east".into()),
                None,
                Some("west".into()),
            ],
        ),
        Column::from_options("units", vec![Some(1i64), Some(2), Some(3), None, Some(5), Some(6)]),
        Column::from_values("price", vec![10.0f64, 20.0, 30.0, 40.0, 50.0, 60.0]),
        Column::from_values::<Arc<str>>(
            "label",
            vec![
                "a".into(),
                "b".into(),
                "a".into(),
                "c".into(),
                "c".into(),
                "b".into(),
            ],
        ),
    ])
    .unwrap()
}

fn cells(table: &Table, name: &str) -> Vec<Option<Scalar>> {
    table.column(name).unwrap().iter().collect()
}

#[test]
fn groups_partition_rows_in_first_seen_order() {
    let table = sales();
    let grouping = group_by(&table, &["region"]).unwrap();

    let keys: Vec<&[Option<Scalar>]> = grouping.groups().iter().map(|g| g.key()).collect();
    assert_eq!(
        keys,
        vec![
            &[Some(Scalar::from("east"))][..],
            &[Some(Scalar::from("west"))][..],
            &[None][..],
        ]
    );

    let total: usize = grouping.groups().iter().map(|g| g.len()).sum();
    assert_eq!(total, table.row_count());

    let mut seen: Vec<usize> = grouping
        .groups()
        .iter()
        .flat_map(|g| g.rows().iter().copied())
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..table.row_count()).collect::<Vec<_>>());
    assert_eq!(grouping.groups()[2].rows(), &[2, 4]);
}

#[test]
fn composite_keys_match_on_the_whole_tuple() {
    let table = Table::new(vec![
        Column::from_options("a", vec![Some(1i64), Some(1), None, Some(1), None]),
        Column::from_values("b", vec![2i64, 1, 2, 2, 2]),
    ])
    .unwrap();
    let grouping = group_by(&table, &["a", "b"]).unwrap();

    let rows: Vec<&[usize]> = grouping.groups().iter().map(|g| g.rows()).collect();
    assert_eq!(rows, vec![&[0, 3][..], &[1][..], &[2, 4][..]]);
    assert_eq!(
        grouping.groups()[2].key(),
        &[None, Some(Scalar::from(2))][..]
    );

    let out = grouping
        .summarise(vec![Aggregate::Count.named("n")])
        .unwrap();
    assert_eq!(out.column_names(), vec!["a", "b", "n"]);
    assert_eq!(
        cells(&out, "a"),
        vec![Some(Scalar::from(1)), Some(Scalar::from(1)), None]
    );
    assert_eq!(
        cells(&out, "b"),
        vec![Some(Scalar::from(2)), Some(Scalar::from(1)), Some(Scalar::from(2))]
    );
    assert_eq!(
        cells(&out, "n"),
        vec![Some(Scalar::from(2)), Some(Scalar::from(1)), Some(Scalar::from(2))]
    );
}

#[test]
fn spread_and_weighted_aggregates_per_group() {
    let table = sales();
    let out = group_by(&table, &["region"])
        .unwrap()
        .summarise(vec![
            Aggregate::min("units").named("min_units"),
            Aggregate::average("price").named("avg_price"),
            Aggregate::Range("price".into()).named("price_range"),
            Aggregate::Variance("price".into()).named("price_var"),
            Aggregate::StdDev("price".into()).named("price_sd"),
            Aggregate::weighted_average("price", "units").named("weighted_price"),
            Aggregate::First("units".into()).named("first_units"),
            Aggregate::First("label".into()).named("first_label"),
        ])
        .unwrap();

    let floats = |values: [f64; 3]| -> Vec<Option<Scalar>> {
        values.into_iter().map(|v| Some(Scalar::from(v))).collect()
    };
    assert_eq!(out.column("min_units").unwrap().kind(), ScalarKind::Integer);
    assert_eq!(
        cells(&out, "min_units"),
        vec![Some(Scalar::from(1)), Some(Scalar::from(2)), Some(Scalar::from(3))]
    );
    assert_eq!(cells(&out, "avg_price"), floats([25.0, 40.0, 40.0]));
    assert_eq!(cells(&out, "price_range"), floats([30.0, 40.0, 20.0]));
    assert_eq!(cells(&out, "price_var"), floats([225.0, 400.0, 100.0]));
    assert_eq!(cells(&out, "price_sd"), floats([15.0, 20.0, 10.0]));
    // east has a null weight on its second row, so only the first row counts.
    assert_eq!(cells(&out, "weighted_price"), floats([10.0, 50.0, 42.5]));
    assert_eq!(
        cells(&out, "first_units"),
        vec![Some(Scalar::from(1)), Some(Scalar::from(2)), Some(Scalar::from(3))]
    );
    assert_eq!(
        cells(&out, "first_label"),
        vec![
            Some(Scalar::from("a")),
            Some(Scalar::from("b")),
            Some(Scalar::from("a"))
        ]
    );
}

#[test]
fn summarise_keeps_key_kinds_and_spec_order() {
    let table = sales();
    let out = group_by(&table, &["region"])
        .unwrap()
        .summarise(vec![
            Aggregate::Count.named("n"),
            Aggregate::sum("units").named("units"),
            Aggregate::CountNonNull("units".into()).named("units_present"),
            Aggregate::max("price").named("top_price"),
        ])
        .unwrap();

    assert_eq!(
        out.schema(),
        vec![
            ("region", ScalarKind::Text),
            ("n", ScalarKind::Integer),
            ("units", ScalarKind::Float),
            ("units_present", ScalarKind::Integer),
            ("top_price", ScalarKind::Float),
        ]
    );
    assert_eq!(
        cells(&out, "region"),
        vec![Some(Scalar::from("east")), Some(Scalar::from("west")), None]
    );
    assert_eq!(
        cells(&out, "n"),
        vec![Some(Scalar::from(2)), Some(Scalar::from(2)), Some(Scalar::from(2))]
    );
    assert_eq!(
        cells(&out, "units"),
        vec![
            Some(Scalar::from(1.0)),
            Some(Scalar::from(8.0)),
            Some(Scalar::from(8.0))
        ]
    );
    assert_eq!(
        cells(&out, "units_present"),
        vec![Some(Scalar::from(1)), Some(Scalar::from(2)), Some(Scalar::from(2))]
    );
    assert_eq!(
        cells(&out, "top_price"),
        vec![
            Some(Scalar::from(40.0)),
            Some(Scalar::from(60.0)),
            Some(Scalar::from(50.0))
        ]
    );
}

#[test]
fn aggregation_edge_cases() {
    let table = Table::new(vec![
        Column::from_values("k", vec![1i64, 1, 1, 1]),
        Column::from_values("v", vec![1.0f64, 2.0, 3.0, 4.0]),
        Column::from_options("p", vec![Some(10i64), Some(20), Some(30), None]),
        Column::from_values("flat", vec![7.0f64, 7.0, 7.0, 7.0]),
    ])
    .unwrap();

    let out = group_by(&table, &["k"])
        .unwrap()
        .summarise(vec![
            Aggregate::median("v").named("median"),
            Aggregate::percentile("p", 0.5).named("p50"),
            Aggregate::correlation("v", "flat").named("corr"),
            Aggregate::correlation("v", "v").named("self_corr"),
        ])
        .unwrap();

    assert_eq!(cells(&out, "median"), vec![Some(Scalar::from(2.5))]);
    assert_eq!(cells(&out, "p50"), vec![Some(Scalar::from(20.0))]);
    assert_eq!(cells(&out, "corr"), vec![None]);
    assert_eq!(cells(&out, "self_corr"), vec![Some(Scalar::from(1.0))]);
}

#[test]
fn value_aggregates_follow_source_kind() {
    let table = sales();
    let out = group_by(&table, &["region"])
        .unwrap()
        .summarise(vec![
            Aggregate::Mode("label".into()).named("mode"),
            Aggregate::Last("units".into()).named("last_units"),
            Aggregate::Last("label".into()).named("last"),
            Aggregate::CountDistinct("label".into()).named("distinct"),
        ])
        .unwrap();

    assert_eq!(out.column("mode").unwrap().kind(), ScalarKind::Text);
    assert_eq!(out.column("last_units").unwrap().kind(), ScalarKind::Integer);
    assert_eq!(
        cells(&out, "mode"),
        vec![
            Some(Scalar::from("a")),
            Some(Scalar::from("b")),
            Some(Scalar::from("a"))
        ]
    );
    // east's last row has a null `units`.
    assert_eq!(
        cells(&out, "last_units"),
        vec![Some(Scalar::from(1)), Some(Scalar::from(6)), Some(Scalar::from(5))]
    );
    assert_eq!(
        cells(&out, "last"),
        vec![
            Some(Scalar::from("c")),
            Some(Scalar::from("b")),
            Some(Scalar::from("c"))
        ]
    );
    assert_eq!(
        cells(&out, "distinct"),
        vec![Some(Scalar::from(2)), Some(Scalar::from(1)), Some(Scalar::from(2))]
    );
}

#[test]
fn numeric_aggregate_on_text_is_a_null_cell() {
    let table = sales();
    let out = group_by(&table, &["region"])
        .unwrap()
        .summarise(vec![Aggregate::average("label").named("avg")])
        .unwrap();
    assert_eq!(out.column("avg").unwrap().null_count(), 3);
}

#[test]
fn custom_aggregators() {
    let table = sales();
    let out = group_by(&table, &["region"])
        .unwrap()
        .summarise(vec![
            AggregateSpec::new("rows", |rows: &GroupRows<'_>| {
                let labels = rows
                    .iter()
                    .map(|row| row.get_typed::<String>("label"))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(labels.into_iter().flatten().collect::<Vec<_>>().join("+")))
            }),
            AggregateSpec::new("never", |_: &GroupRows<'_>| Ok(None::<bool>)),
        ])
        .unwrap();

    assert_eq!(
        cells(&out, "rows"),
        vec![
            Some(Scalar::from("a+c")),
            Some(Scalar::from("b+b")),
            Some(Scalar::from("a+c"))
        ]
    );
    assert_eq!(out.column("never").unwrap().kind(), ScalarKind::Boolean);
    assert_eq!(out.column("never").unwrap().null_count(), 3);
}

#[test]
fn configuration_errors_surface_before_evaluation() {
    let table = sales();
    assert!(matches!(
        group_by(&table, &[] as &[&str]),
        Err(TableError::Config(_))
    ));
    assert_eq!(
        group_by(&table, &["nope"]).unwrap_err(),
        TableError::ColumnNotFound("nope".into())
    );

    let grouping = group_by(&table, &["region"]).unwrap();
    assert!(matches!(
        grouping.summarise(vec![Aggregate::Count.named("region")]),
        Err(TableError::Config(_))
    ));
    assert!(matches!(
        grouping.summarise(vec![Aggregate::Count.named("n"), Aggregate::Count.named("n")]),
        Err(TableError::Config(_))
    ));
    assert!(matches!(
        grouping.summarise(vec![Aggregate::Count.named("")]),
        Err(TableError::Config(_))
    ));
    assert_eq!(
        grouping
            .summarise(vec![Aggregate::sum("missing").named("s")])
            .unwrap_err(),
        TableError::ColumnNotFound("missing".into())
    );
    assert!(matches!(
        grouping.summarise(vec![Aggregate::percentile("units", 1.5).named("p")]),
        Err(TableError::Config(_))
    ));
}

#[test]
fn empty_table_has_no_groups() {
    let table = sales().slice_rows(&[]).unwrap();
    let out = group_by(&table, &["region"])
        .unwrap()
        .summarise(vec![Aggregate::Count.named("n")])
        .unwrap();
    assert_eq!(out.row_count(), 0);
    assert_eq!(out.column_names(), vec!["region", "n"]);
}
