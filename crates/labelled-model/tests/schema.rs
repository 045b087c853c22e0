//! Tests for the schema manifest form.

use labelled_model::{FieldSchema, FieldType, LabelledError, TableSchema, Value};

#[test]
fn parses_manifest_fields() {
    let json = r#"{
        "fields": [
            {
                "name": "day_scale",
                "type": "integer",
                "title": "ignored",
                "constraints": { "enum": [1, 2, 3, 4, 5], "required": true },
                "enumOrdered": true,
                "enumLabels": { "1": "Very bad", "5": "Very good", "-99": "Refused" },
                "description": "How was your day?"
            },
            { "name": "favorite_color" }
        ],
        "missingValues": ["-99", "-98"]
    }"#;
    let schema: TableSchema = serde_json::from_str(json).expect("parse schema");

    assert_eq!(schema.missing_values, vec!["-99", "-98"]);
    let day = schema.field("day_scale").expect("day_scale");
    assert_eq!(day.field_type, FieldType::Integer);
    assert!(day.ordered);
    assert_eq!(
        day.domain.as_deref(),
        Some(&["1", "2", "3", "4", "5"].map(String::from)[..])
    );
    assert_eq!(day.labels.get("-99").map(String::as_str), Some("Refused"));
    assert_eq!(day.description.as_deref(), Some("How was your day?"));

    let color = schema.field("favorite_color").expect("favorite_color");
    assert_eq!(color.field_type, FieldType::String);
    assert!(color.domain.is_none());
    assert!(!color.ordered);
}

#[test]
fn canonicalises_mixed_enum_members() {
    let json = r#"{ "name": "x", "type": "number", "constraints": { "enum": ["0.5", 1, 2.5] } }"#;
    let field: FieldSchema = serde_json::from_str(json).expect("parse field");
    assert_eq!(
        field.domain,
        Some(vec!["0.5".to_string(), "1".to_string(), "2.5".to_string()])
    );
    let typed = field.typed_domain().expect("typed").expect("domain");
    assert_eq!(
        typed,
        vec![Value::Number(0.5), Value::Number(1.0), Value::Number(2.5)]
    );
}

#[test]
fn rejects_unknown_types() {
    let json = r#"{ "name": "x", "type": "decimal" }"#;
    let error = serde_json::from_str::<FieldSchema>(json).expect_err("unknown type");
    let expected = LabelledError::UnknownFieldType {
        field: "x".to_string(),
        token: "decimal".to_string(),
    };
    assert!(error.to_string().contains(&expected.to_string()));
}

#[test]
fn serialises_back_to_manifest_layout() {
    let field = FieldSchema::new("sex", FieldType::String)
        .with_domain(["F", "M"])
        .with_label("F", "Female")
        .with_description("Sex at birth");
    let json = serde_json::to_value(&field).expect("serialize");
    assert_eq!(json["type"], "string");
    assert_eq!(json["constraints"]["enum"][1], "M");
    assert_eq!(json["enumLabels"]["F"], "Female");
    assert!(json.get("enumOrdered").is_none());

    let round: FieldSchema = serde_json::from_value(json).expect("deserialize");
    assert_eq!(round, field);
}
