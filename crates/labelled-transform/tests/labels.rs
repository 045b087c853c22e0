//! Tests for label transforms on loaded tables.

use labelled_ingest::{ChannelSpec, MissingRecognizer, RawGrid, split};
use labelled_model::{
    Cell, ColumnType, FactorLevels, FieldSchema, FieldType, LabelMap, LabelledColumn, LabelledError,
    Missing, Representation, Table, TableSchema, Value, ValueType,
};
use labelled_transform::{LabelTransform, apply_labels, as_factor, zap_labels};

fn day_scale_table() -> Table {
    let grid = RawGrid::from_rows(
        &["day_scale", "mood"],
        &[&["2", "ok"], &["3", "-99"], &["4", "fine"]],
    );
    let schema = TableSchema::new(vec![
        FieldSchema::new("day_scale", FieldType::Integer)
            .with_domain(["1", "2", "3", "4", "5"])
            .with_ordered(true)
            .with_label("1", "Very bad")
            .with_label("5", "Very good"),
        FieldSchema::text("mood").with_label("ok", "Okay"),
    ]);
    split(
        &grid,
        &schema,
        &MissingRecognizer::new(["-99"]),
        &ChannelSpec::values(),
    )
    .expect("split")
}

fn scale() -> Vec<Value> {
    (1..=5).map(Value::Integer).collect()
}

#[test]
fn value_factor_keeps_unobserved_levels() {
    let table = day_scale_table();
    let column = table.column("day_scale").expect("day_scale");
    let factor = as_factor(column, FactorLevels::Values);

    assert_eq!(factor.representation(), Representation::Factor(FactorLevels::Values));
    assert_eq!(factor.declared_domain(), Some(&scale()[..]));
    assert_eq!(
        factor.levels(),
        vec!["Very bad", "2", "3", "4", "Very good"]
    );
    assert_eq!(
        factor.unobserved_members(),
        vec![Value::Integer(1), Value::Integer(5)]
    );
    assert_eq!(factor.cells(), &[Cell::Level(1), Cell::Level(2), Cell::Level(3)]);
    assert!(factor.ordered());
}

#[test]
fn label_factor_drops_unlabelled_entries() {
    let table = day_scale_table();
    let column = table.column("day_scale").expect("day_scale");
    let factor = as_factor(column, FactorLevels::Labels);

    assert_eq!(factor.declared_domain(), Some(&scale()[..]));
    assert_eq!(factor.levels(), vec!["Very bad", "Very good"]);
    assert!(
        factor
            .cells()
            .iter()
            .all(|cell| *cell == Cell::Missing(Missing::Unlabelled))
    );
    assert!(factor.displays().iter().all(Option::is_none));
}

#[test]
fn zap_keeps_factor_domain() {
    let table = day_scale_table();
    let factor = as_factor(table.column("day_scale").expect("day_scale"), FactorLevels::Values);
    let zapped = zap_labels(&factor);

    assert_eq!(zapped.declared_domain(), factor.declared_domain());
    assert!(zapped.column_type().is_categorical());
    assert!(zapped.label_map().is_empty());
    assert_eq!(zapped.levels(), vec!["1", "2", "3", "4", "5"]);
    assert_eq!(zapped.display(0).as_deref(), Some("2"));
}

#[test]
fn refactoring_switches_level_mode() {
    let table = day_scale_table();
    let column = table.column("day_scale").expect("day_scale");
    let by_values = as_factor(column, FactorLevels::Values);
    assert_eq!(as_factor(&by_values, FactorLevels::Values), by_values);

    let by_labels = as_factor(&by_values, FactorLevels::Labels);
    assert_eq!(by_labels, as_factor(column, FactorLevels::Labels));
}

#[test]
fn apply_labels_is_an_overlay() {
    let table = day_scale_table();
    let mood = table.column("mood").expect("mood");
    let labelled = apply_labels(mood);

    assert_eq!(labelled.display(0).as_deref(), Some("Okay"));
    assert_eq!(labelled.display(1), None);
    assert_eq!(labelled.display(2).as_deref(), Some("fine"));
    assert_eq!(labelled.value(0), Some(&Value::from("ok")));
    assert_eq!(apply_labels(&labelled), labelled);
    assert_eq!(zap_labels(&labelled).display(0).as_deref(), Some("ok"));
}

#[test]
fn table_transforms_broadcast_per_column() {
    let table = day_scale_table();
    let factors = table.as_factor(FactorLevels::Values).expect("factor");
    assert_eq!(factors.names(), table.names());
    assert_eq!(factors.height(), table.height());
    assert!(
        factors
            .iter()
            .all(|(_, column)| column.representation() == Representation::Factor(FactorLevels::Values))
    );

    let mood = factors.column("mood").expect("mood");
    assert_eq!(mood.levels(), vec!["fine", "Okay"]);

    let labelled = table.apply_labels().expect("labels");
    assert_eq!(
        labelled.column("mood").and_then(|column| column.display(0)).as_deref(),
        Some("Okay")
    );
    let zapped = labelled.zap_labels().expect("zap");
    assert_eq!(zapped.column("mood").map(LabelledColumn::is_labelled), Some(false));
}

#[test]
fn factors_only_carry_levels_of_the_column_type() {
    let error = LabelledColumn::builder(ColumnType::Plain(ValueType::Integer))
        .cells([Some(1i64)])
        .labels(LabelMap::new().with(1i64, "One").with("x", "Ex"))
        .build()
        .expect_err("text label key on an integer column");
    assert!(matches!(error, LabelledError::TypeMismatch { .. }));

    let table = day_scale_table();
    for mode in [FactorLevels::Values, FactorLevels::Labels] {
        let factor = as_factor(table.column("day_scale").expect("day_scale"), mode);
        assert_eq!(factor.column_type(), ColumnType::Categorical(ValueType::Integer));
        let rebuilt = LabelledColumn::builder(factor.column_type())
            .cells(factor.cells().to_vec())
            .domain(factor.shared_domain().expect("domain"))
            .labels(factor.shared_labels())
            .variable_label(factor.variable_label().map(str::to_string))
            .ordered(factor.ordered())
            .representation(factor.representation())
            .build()
            .expect("factor satisfies column invariants");
        assert_eq!(rebuilt, factor);
    }
}
