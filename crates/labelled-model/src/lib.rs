//! Labelled column data model.
//!
//! - **schema**: field schemas and their manifest serde form
//! - **value**: typed scalar values with a total order
//! - **cell**: column entries and missing-value markers
//! - **column**: [`LabelledColumn`], label maps and representations
//! - **table**: [`Table`], an ordered set of equal-length columns

pub mod cell;
pub mod column;
pub mod error;
pub mod schema;
pub mod table;
pub mod value;

pub use cell::{Cell, Missing};
pub use column::{
    ColumnBuilder, ColumnType, FactorLevels, LabelMap, LabelledColumn, Representation,
};
pub use error::{LabelledError, Result};
pub use schema::{FieldSchema, FieldType, TableSchema};
pub use table::Table;
pub use value::{Value, ValueType, format_number, parse_bool, parse_f64, parse_i64};
