//! Column entries and missing-value markers.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Why an entry holds no value.
///
/// Every kind surfaces as "missing" to consumers. The kinds stay distinct so
/// diagnostics can tell a recognised missing token from a conversion failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "raw", rename_all = "snake_case")]
pub enum Missing {
    /// No value and no recorded reason.
    Absent,
    /// The raw cell matched a configured missing token.
    Declared,
    /// The raw cell did not parse as the field's declared type.
    Invalid(String),
    /// The raw cell parsed but is not a member of the declared domain.
    OutOfDomain(String),
    /// Dropped by a label-only factor conversion because the value had no label.
    Unlabelled,
}

impl Missing {
    /// True for the parse-level kinds (`Invalid`, `OutOfDomain`).
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Missing::Invalid(_) | Missing::OutOfDomain(_))
    }

    /// Raw text that failed conversion, if any.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Missing::Invalid(raw) | Missing::OutOfDomain(raw) => Some(raw),
            _ => None,
        }
    }
}

/// A single column entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// A typed value.
    Value(Value),
    /// Index into the declared domain of a categorical column.
    Level(usize),
    /// No value.
    Missing(Missing),
}

impl Cell {
    pub fn missing() -> Self {
        Cell::Missing(Missing::Absent)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing(_))
    }

    pub fn as_missing(&self) -> Option<&Missing> {
        match self {
            Cell::Missing(missing) => Some(missing),
            _ => None,
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Cell::Value(value)
    }
}

impl From<Missing> for Cell {
    fn from(missing: Missing) -> Self {
        Cell::Missing(missing)
    }
}

impl<T: Into<Value>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Cell::Value(value.into()),
            None => Cell::missing(),
        }
    }
}
