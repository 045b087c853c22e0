//! Tests for Polars export.

use labelled_ingest::{ChannelSpec, MissingRecognizer, RawGrid, split};
use labelled_model::{FactorLevels, FieldSchema, FieldType, TableSchema};
use labelled_transform::{LabelTransform, to_dataframe};
use polars::prelude::DataType;

fn survey() -> labelled_model::Table {
    let grid = RawGrid::from_rows(
        &["age", "score", "smoker"],
        &[&["20", "1.5", "true"], &["-99", "NA", "false"]],
    );
    let schema = TableSchema::new(vec![
        FieldSchema::new("age", FieldType::Integer).with_label("-99", "Refused"),
        FieldSchema::new("score", FieldType::Number),
        FieldSchema::new("smoker", FieldType::Boolean).with_label("true", "Smokes"),
    ]);
    split(
        &grid,
        &schema,
        &MissingRecognizer::new(["-99", "NA"]),
        &ChannelSpec::values_and_missing(),
    )
    .expect("split")
}

#[test]
fn raw_export_keeps_physical_types() {
    let df = to_dataframe(&survey()).expect("frame");
    assert_eq!(df.height(), 2);
    assert_eq!(df.width(), 6);
    assert_eq!(df.column("age_values").expect("age").dtype(), &DataType::Int64);
    assert_eq!(df.column("score_values").expect("score").dtype(), &DataType::Float64);
    assert_eq!(df.column("smoker_values").expect("smoker").dtype(), &DataType::Boolean);

    let age = df.column("age_values").expect("age").i64().expect("i64");
    assert_eq!(age.get(0), Some(20));
    assert_eq!(age.get(1), None);

    let reasons = df.column("age_missing").expect("reasons").str().expect("str");
    assert_eq!(reasons.get(0), None);
    assert_eq!(reasons.get(1), Some("-99"));
}

#[test]
fn labelled_export_uses_display_text() {
    let table = survey().apply_labels().expect("labels");
    let df = to_dataframe(&table).expect("frame");

    let reasons = df.column("age_missing").expect("reasons").str().expect("str");
    assert_eq!(reasons.get(1), Some("Refused"));

    let smoker = df.column("smoker_values").expect("smoker").str().expect("str");
    assert_eq!(smoker.get(0), Some("Smokes"));
    assert_eq!(smoker.get(1), Some("false"));
}

#[test]
fn label_factors_export_nulls_for_unlabelled_entries() {
    let table = survey().as_factor(FactorLevels::Labels).expect("factor");
    let df = to_dataframe(&table).expect("frame");
    let smoker = df.column("smoker_values").expect("smoker").str().expect("str");
    assert_eq!(smoker.get(0), Some("Smokes"));
    assert_eq!(smoker.get(1), None);
}
