//! Polars export.
//!
//! Raw columns keep their physical dtype (`Int64`, `Float64`, `Boolean`,
//! `String`). Labelled overlays and factors export their display text, so
//! label-only factors show nulls for unlabelled entries.

use std::borrow::Cow;

use polars::prelude::{Column, DataFrame, NamedFrom, PolarsResult, Series};

use labelled_model::{LabelledColumn, Representation, Table, Value, ValueType};

/// Convert a table to a Polars `DataFrame`, column for column.
///
/// # Errors
///
/// Returns a Polars error if the frame cannot be assembled.
pub fn to_dataframe(table: &Table) -> PolarsResult<DataFrame> {
    let columns: Vec<Column> = table
        .iter()
        .map(|(name, column)| to_series(name, column).into())
        .collect();
    DataFrame::new(columns)
}

/// Convert one column to a named `Series`.
pub fn to_series(name: &str, column: &LabelledColumn) -> Series {
    if column.representation() != Representation::Raw {
        let displays: Vec<Option<String>> = column
            .displays()
            .into_iter()
            .map(|text| text.map(Cow::into_owned))
            .collect();
        return Series::new(name.into(), displays);
    }
    match column.value_type() {
        ValueType::Integer => Series::new(name.into(), typed(column, Value::as_i64)),
        ValueType::Number => Series::new(name.into(), typed(column, Value::as_f64)),
        ValueType::Boolean => Series::new(name.into(), typed(column, Value::as_bool)),
        ValueType::Text => Series::new(
            name.into(),
            typed(column, |value| value.as_str().map(str::to_string)),
        ),
    }
}

fn typed<T>(column: &LabelledColumn, extract: impl Fn(&Value) -> Option<T>) -> Vec<Option<T>> {
    column
        .values()
        .map(|value| value.and_then(&extract))
        .collect()
}
