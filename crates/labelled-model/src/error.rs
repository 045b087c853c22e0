use thiserror::Error;

/// Configuration and invariant errors raised by the labelled data model.
///
/// Data-level anomalies (unparseable cells, values outside a declared domain,
/// unlabelled factor entries) are never reported here; they become
/// [`Missing`](crate::Missing) markers instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelledError {
    #[error("unknown channel '{token}' (expected 'values' or 'missing')")]
    UnknownChannel { token: String },

    #[error("channel '{kind}' requested more than once")]
    DuplicateChannel { kind: String },

    #[error("at least one channel must be requested")]
    EmptyChannelSpec,

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column name '{name}'")]
    DuplicateColumnName { name: String },

    #[error("column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("missing token '{token}' is also a domain member of field '{field}'")]
    AmbiguousMissingToken { field: String, token: String },

    #[error("enumeration member '{token}' of field '{field}' is not a valid {expected}")]
    InvalidDomainMember {
        field: String,
        token: String,
        expected: String,
    },

    #[error("unknown field type '{token}' for field '{field}'")]
    UnknownFieldType { field: String, token: String },

    #[error("invalid schema for field '{field}': {message}")]
    InvalidSchema { field: String, message: String },

    #[error("value '{value}' is not a {expected}")]
    TypeMismatch { value: String, expected: String },

    #[error("value '{value}' is outside the declared domain")]
    ValueOutsideDomain { value: String },

    #[error("level index {index} is out of range for {levels} levels")]
    LevelOutOfRange { index: usize, levels: usize },
}

pub type Result<T> = std::result::Result<T, LabelledError>;
