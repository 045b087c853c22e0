//! Load diagnostics.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use labelled_model::{Cell, Missing};

/// Kind of schema inconsistency found while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    /// A label key is neither a domain member nor a recognised missing token.
    SchemaLabelDomainMismatch,
    /// A schema field names no column of the source.
    UnmatchedField,
}

/// A schema problem that did not abort loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaWarning {
    pub field: String,
    pub kind: WarningKind,
    pub token: String,
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::SchemaLabelDomainMismatch => write!(
                f,
                "label for '{}' on field '{}' matches neither a domain member nor a missing token",
                self.token, self.field
            ),
            WarningKind::UnmatchedField => {
                write!(f, "schema field '{}' matches no source column", self.field)
            }
        }
    }
}

/// Per-field classification counts for the values channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CellCounts {
    pub present: usize,
    pub declared_missing: usize,
    pub invalid: usize,
    pub out_of_domain: usize,
}

impl CellCounts {
    pub fn record(&mut self, cell: &Cell) {
        match cell {
            Cell::Value(_) | Cell::Level(_) => self.present += 1,
            Cell::Missing(Missing::Invalid(_)) => self.invalid += 1,
            Cell::Missing(Missing::OutOfDomain(_)) => self.out_of_domain += 1,
            Cell::Missing(_) => self.declared_missing += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.present + self.declared_missing + self.invalid + self.out_of_domain
    }

    /// Cells that were present in the source but could not be converted.
    pub fn parse_failures(&self) -> usize {
        self.invalid + self.out_of_domain
    }
}

/// Diagnostics from one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows: usize,
    pub warnings: Vec<SchemaWarning>,
    pub fields: BTreeMap<String, CellCounts>,
}

impl LoadReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn parse_failures(&self) -> usize {
        self.fields.values().map(CellCounts::parse_failures).sum()
    }
}
