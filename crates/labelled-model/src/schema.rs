//! Field schemas.
//!
//! A [`FieldSchema`] describes one source column: its declared type, an
//! optional enumeration domain, an ordering flag, value labels and a
//! description. Schemas are produced by an external loader and consumed
//! read-only.
//!
//! ## Manifest fragment
//!
//! The serde form follows the table-schema manifest layout:
//!
//! ```json
//! {
//!   "name": "day_scale",
//!   "type": "integer",
//!   "constraints": { "enum": [1, 2, 3, 4, 5] },
//!   "enumOrdered": true,
//!   "enumLabels": { "1": "Very bad", "5": "Very good", "-99": "Refused" },
//!   "description": "How was your day?"
//! }
//! ```
//!
//! Enumeration members may be strings, integers, floats or booleans; they are
//! kept as canonical string tokens and converted to typed values with
//! [`FieldSchema::typed_domain`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LabelledError, Result};
use crate::value::{Value, ValueType, format_number};

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Number,
    String,
    Boolean,
    Date,
    Time,
    Datetime,
    Year,
    #[serde(rename = "yearmonth")]
    YearMonth,
    Duration,
    Any,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Datetime => "datetime",
            FieldType::Year => "year",
            FieldType::YearMonth => "yearmonth",
            FieldType::Duration => "duration",
            FieldType::Any => "any",
        }
    }

    /// Physical value type used for cells of this field.
    ///
    /// Temporal and `any` fields are kept as text.
    pub fn value_type(&self) -> ValueType {
        match self {
            FieldType::Integer => ValueType::Integer,
            FieldType::Number => ValueType::Number,
            FieldType::Boolean => ValueType::Boolean,
            FieldType::String
            | FieldType::Date
            | FieldType::Time
            | FieldType::Datetime
            | FieldType::Year
            | FieldType::YearMonth
            | FieldType::Duration
            | FieldType::Any => ValueType::Text,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "integer" => Ok(FieldType::Integer),
            "number" => Ok(FieldType::Number),
            "string" => Ok(FieldType::String),
            "boolean" => Ok(FieldType::Boolean),
            "date" => Ok(FieldType::Date),
            "time" => Ok(FieldType::Time),
            "datetime" => Ok(FieldType::Datetime),
            "year" => Ok(FieldType::Year),
            "yearmonth" => Ok(FieldType::YearMonth),
            "duration" => Ok(FieldType::Duration),
            "any" => Ok(FieldType::Any),
            _ => Err(format!("Unknown field type: {s}")),
        }
    }
}

/// Schema of one source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldFragment", into = "FieldFragment")]
pub struct FieldSchema {
    pub name: String,
    pub field_type: FieldType,
    /// Canonical enumeration tokens, in declaration order.
    pub domain: Option<Vec<String>>,
    /// Whether the domain is ordinal. Carried through, never interpreted.
    pub ordered: bool,
    /// Value token (domain member or missing token) to label text.
    pub labels: BTreeMap<String, String>,
    pub description: Option<String>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            domain: None,
            ordered: false,
            labels: BTreeMap::new(),
            description: None,
        }
    }

    /// Plain text field without domain or labels.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    #[must_use]
    pub fn with_domain<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain = Some(members.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    #[must_use]
    pub fn with_label(mut self, token: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(token.into(), label.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn value_type(&self) -> ValueType {
        self.field_type.value_type()
    }

    /// Convert the enumeration tokens to typed values.
    ///
    /// Members are deduplicated by typed value, keeping the first occurrence,
    /// so `"1"` and `"01"` on an integer field collapse to one member.
    pub fn typed_domain(&self) -> Result<Option<Vec<Value>>> {
        let Some(tokens) = &self.domain else {
            return Ok(None);
        };
        let value_type = self.value_type();
        let mut seen = BTreeSet::new();
        let mut members = Vec::with_capacity(tokens.len());
        for token in tokens {
            let value =
                value_type
                    .parse(token)
                    .ok_or_else(|| LabelledError::InvalidDomainMember {
                        field: self.name.clone(),
                        token: token.clone(),
                        expected: self.field_type.to_string(),
                    })?;
            if seen.insert(value.clone()) {
                members.push(value);
            }
        }
        Ok(Some(members))
    }
}

/// Schema of a whole source table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    /// Table-level missing tokens.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_values: Vec<String>,
}

impl TableSchema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self {
            fields,
            missing_values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_missing_values<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_values = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Look up a field by exact name. The first declaration wins.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldSchema> for TableSchema {
    fn from_iter<T: IntoIterator<Item = FieldSchema>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldFragment {
    name: String,
    #[serde(rename = "type", default = "default_type")]
    field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    constraints: Option<Constraints>,
    #[serde(default, skip_serializing_if = "is_false")]
    enum_ordered: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    enum_labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Constraints {
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    members: Option<Vec<Token>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Token {
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
}

impl Token {
    fn into_canonical(self) -> String {
        match self {
            Token::Text(text) => text,
            Token::Integer(v) => v.to_string(),
            Token::Number(v) => format_number(v),
            Token::Boolean(v) => v.to_string(),
        }
    }
}

fn default_type() -> String {
    FieldType::String.as_str().to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TryFrom<FieldFragment> for FieldSchema {
    type Error = LabelledError;

    fn try_from(fragment: FieldFragment) -> Result<Self> {
        let field_type =
            fragment
                .field_type
                .parse()
                .map_err(|_| LabelledError::UnknownFieldType {
                    field: fragment.name.clone(),
                    token: fragment.field_type.clone(),
                })?;
        let domain = fragment
            .constraints
            .and_then(|constraints| constraints.members)
            .map(|members| members.into_iter().map(Token::into_canonical).collect());
        Ok(Self {
            name: fragment.name,
            field_type,
            domain,
            ordered: fragment.enum_ordered,
            labels: fragment.enum_labels,
            description: fragment.description,
        })
    }
}

impl From<FieldSchema> for FieldFragment {
    fn from(field: FieldSchema) -> Self {
        Self {
            name: field.name,
            field_type: field.field_type.as_str().to_string(),
            constraints: field.domain.map(|members| Constraints {
                members: Some(members.into_iter().map(Token::Text).collect()),
            }),
            enum_ordered: field.ordered,
            enum_labels: field.labels,
            description: field.description,
        }
    }
}
