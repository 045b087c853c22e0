//! Tests for loading delimited sources and schema manifests.

use std::io::Write;

use labelled_ingest::{
    ChannelSpec, IngestError, LoadOptions, MissingRecognizer, load, load_path, read_schema,
    read_schema_path,
};
use labelled_model::{Cell, FieldSchema, FieldType, LabelledError, Missing, TableSchema, Value};

const SURVEY_SCHEMA: &str = r#"{
    "fields": [
        { "name": "age", "type": "integer", "enumLabels": { "-99": "Refused" } },
        {
            "name": "day_scale",
            "type": "integer",
            "constraints": { "enum": [1, 2, 3, 4, 5] },
            "enumOrdered": true,
            "enumLabels": { "1": "Very bad", "5": "Very good" }
        }
    ],
    "missingValues": ["-99", "-98"]
}"#;

#[test]
fn loads_with_schema_missing_values() {
    let schema = read_schema(SURVEY_SCHEMA.as_bytes()).expect("schema");
    let options = LoadOptions::new()
        .with_schema(schema)
        .with_channels(ChannelSpec::values_and_missing());
    let data = "age,day_scale\n31,2\n-99,5\n-98,\n";
    let outcome = load(data.as_bytes(), &options).expect("load");

    let table = &outcome.table;
    assert_eq!(
        table.names(),
        vec!["age_values", "age_missing", "day_scale_values", "day_scale_missing"]
    );
    assert_eq!(table.height(), 3);

    let age_missing = table.column("age_missing").expect("age_missing");
    assert_eq!(age_missing.value(1), Some(&Value::from("-99")));
    assert_eq!(
        age_missing.label_map().get(&Value::from("-99")),
        Some("Refused")
    );
    assert_eq!(age_missing.value(2), Some(&Value::from("-98")));

    // Empty is not a missing token once the schema supplies its own.
    let day = table.column("day_scale_values").expect("day_scale_values");
    assert_eq!(day.cell(2), Some(&Cell::Missing(Missing::Invalid(String::new()))));
    assert_eq!(outcome.report.fields["day_scale"].invalid, 1);
}

#[test]
fn explicit_recognizer_overrides_schema_tokens() {
    let schema = read_schema(SURVEY_SCHEMA.as_bytes()).expect("schema");
    let options = LoadOptions::new()
        .with_schema(schema)
        .with_recognizer(MissingRecognizer::new(["-99", ""]));
    let outcome = load("age,day_scale\n-98,\n".as_bytes(), &options).expect("load");
    let age = outcome.table.column("age").expect("age");
    assert_eq!(age.value(0), Some(&Value::Integer(-98)));
    let day = outcome.table.column("day_scale").expect("day_scale");
    assert_eq!(day.cell(0), Some(&Cell::Missing(Missing::Declared)));
}

#[test]
fn honours_delimiter_and_trimming() {
    let schema = TableSchema::new(vec![FieldSchema::new("score", FieldType::Number)]);
    let options = LoadOptions::new()
        .with_delimiter(b';')
        .with_schema(schema)
        .with_na_tokens(["NA"]);
    let outcome = load(" score ;note\n 2.5 ; a \nNA;b\n".as_bytes(), &options).expect("load");
    let table = &outcome.table;
    assert_eq!(table.names(), vec!["score", "note"]);
    let score = table.column("score").expect("score");
    assert_eq!(score.value(0), Some(&Value::Number(2.5)));
    assert_eq!(score.value(1), None);
    assert_eq!(
        table.column("note").and_then(|note| note.value(0)),
        Some(&Value::from("a"))
    );

    let untrimmed = LoadOptions::new().with_trim_cells(false);
    let outcome = load("note\n a \n".as_bytes(), &untrimmed).expect("load");
    assert_eq!(
        outcome.table.column("note").and_then(|note| note.value(0)),
        Some(&Value::from(" a "))
    );
}

#[test]
fn short_rows_are_padded_with_missing_cells() {
    let outcome = load("a,b\n1\n".as_bytes(), &LoadOptions::default()).expect("load");
    let b = outcome.table.column("b").expect("b");
    assert_eq!(b.len(), 1);
    assert_eq!(b.cell(0), Some(&Cell::Missing(Missing::Declared)));
}

#[test]
fn loads_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_path = dir.path().join("survey.csv");
    let schema_path = dir.path().join("survey.schema.json");
    std::fs::write(&data_path, "age,day_scale\n40,3\n").expect("write data");
    let mut schema_file = std::fs::File::create(&schema_path).expect("create schema");
    schema_file
        .write_all(SURVEY_SCHEMA.as_bytes())
        .expect("write schema");

    let schema = read_schema_path(&schema_path).expect("schema");
    let options = LoadOptions::new().with_schema(schema);
    let outcome = load_path(&data_path, &options).expect("load");
    let day = outcome.table.column("day_scale").expect("day_scale");
    assert_eq!(day.value(0), Some(&Value::Integer(3)));
    assert_eq!(day.unobserved_members().len(), 4);
    assert_eq!(outcome.report.rows, 1);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.csv");
    let error = load_path(&path, &LoadOptions::default()).expect_err("missing file");
    match error {
        IngestError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_manifest_is_a_schema_error() {
    let error = read_schema(r#"{ "fields": [ { "name": "x", "type": "decimal" } ] }"#.as_bytes())
        .expect_err("bad type");
    assert!(matches!(error, IngestError::Schema(_)));
}

#[test]
fn configuration_errors_surface_as_model_errors() {
    let schema = TableSchema::new(vec![
        FieldSchema::new("answer", FieldType::Integer).with_domain(["1", "x"]),
    ]);
    let options = LoadOptions::new().with_schema(schema);
    let error = load("answer\n1\n".as_bytes(), &options).expect_err("bad domain");
    assert!(matches!(
        error,
        IngestError::Model(LabelledError::InvalidDomainMember { .. })
    ));
}
