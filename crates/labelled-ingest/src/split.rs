//! Channel splitting.
//!
//! Turns a [`RawGrid`] into a [`Table`] of labelled columns, producing the
//! requested channels for every source column:
//!
//! - **values**: the cell parsed per the field's declared type. Recognised
//!   missing tokens become [`Missing::Declared`]; cells that fail to parse or
//!   fall outside the declared domain become [`Missing::Invalid`] or
//!   [`Missing::OutOfDomain`].
//! - **missing**: the reason tag of recognised missing tokens as text, and
//!   [`Missing::Absent`] for cells that held a value.
//!
//! Output columns are grouped by source column in source order, each group
//! in channel request order.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, debug_span, info, info_span, warn};

use labelled_model::{
    Cell, ColumnType, FieldSchema, LabelMap, LabelledColumn, LabelledError, Missing, Result,
    Table, TableSchema, Value, ValueType,
};

use crate::channel::{ChannelKind, ChannelSpec};
use crate::grid::{RawGrid, normalize_header};
use crate::missing::{Classification, MissingRecognizer};
use crate::report::{CellCounts, LoadReport, SchemaWarning, WarningKind};

/// Table produced by a split together with its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub table: Table,
    pub report: LoadReport,
}

/// Split a grid into channels and return the table.
///
/// # Errors
///
/// See [`ChannelSplitter::split`].
pub fn split(
    grid: &RawGrid,
    schema: &TableSchema,
    recognizer: &MissingRecognizer,
    channels: &ChannelSpec,
) -> Result<Table> {
    ChannelSplitter::new(schema, recognizer, channels)
        .split(grid)
        .map(|outcome| outcome.table)
}

/// Splits raw grids into typed channel columns.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSplitter<'a> {
    schema: &'a TableSchema,
    recognizer: &'a MissingRecognizer,
    channels: &'a ChannelSpec,
    strict_schema: bool,
}

impl<'a> ChannelSplitter<'a> {
    pub fn new(
        schema: &'a TableSchema,
        recognizer: &'a MissingRecognizer,
        channels: &'a ChannelSpec,
    ) -> Self {
        Self {
            schema,
            recognizer,
            channels,
            strict_schema: false,
        }
    }

    /// Fail on label keys that match neither domain nor missing token,
    /// instead of recording a warning.
    #[must_use]
    pub fn strict_schema(mut self, strict: bool) -> Self {
        self.strict_schema = strict;
        self
    }

    /// Split `grid` into the configured channels.
    ///
    /// # Errors
    ///
    /// - [`LabelledError::InvalidDomainMember`] for enumeration members of the wrong type
    /// - [`LabelledError::AmbiguousMissingToken`] if a missing token is a domain member
    /// - [`LabelledError::InvalidSchema`] for unmatched labels in strict mode
    /// - [`LabelledError::DuplicateColumnName`] if output names collide
    pub fn split(&self, grid: &RawGrid) -> Result<SplitOutcome> {
        let span = info_span!(
            "split",
            columns = grid.width(),
            rows = grid.height(),
            channels = self.channels.len()
        );
        let _guard = span.enter();

        let headers: BTreeSet<String> = grid
            .headers
            .iter()
            .map(String::as_str)
            .map(normalize_header)
            .collect();
        let mut unmatched = Vec::new();
        for field in &self.schema.fields {
            if !headers.contains(&normalize_header(&field.name)) {
                let warning = SchemaWarning {
                    field: field.name.clone(),
                    kind: WarningKind::UnmatchedField,
                    token: String::new(),
                };
                warn!(field = %field.name, "{warning}");
                unmatched.push(warning);
            }
        }

        let outputs = grid
            .headers
            .iter()
            .enumerate()
            .map(|(index, name)| self.split_field(grid, index, name))
            .collect::<Result<Vec<FieldOutput>>>()?;

        let mut report = LoadReport {
            rows: grid.height(),
            warnings: unmatched,
            ..LoadReport::default()
        };
        let mut columns = Vec::with_capacity(outputs.len() * self.channels.len());
        for output in outputs {
            report.warnings.extend(output.warnings);
            report.fields.insert(output.source, output.counts);
            columns.extend(output.columns);
        }
        let table = Table::assemble(columns)?;
        info!(
            columns = table.width(),
            warnings = report.warnings.len(),
            parse_failures = report.parse_failures(),
            "split complete"
        );
        Ok(SplitOutcome { table, report })
    }

    fn split_field(&self, grid: &RawGrid, index: usize, name: &str) -> Result<FieldOutput> {
        let span = debug_span!("field", name = %name);
        let _guard = span.enter();

        let default_field;
        let header = normalize_header(name);
        let field = match self
            .schema
            .fields
            .iter()
            .find(|field| normalize_header(&field.name) == header)
        {
            Some(field) => field,
            None => {
                default_field = FieldSchema::text(name);
                &default_field
            }
        };
        let (plan, warnings) = FieldPlan::compile(field, self.recognizer, self.strict_schema)?;

        let mut counts = CellCounts::default();
        let mut columns = Vec::with_capacity(self.channels.len());
        for (kind, column_name) in self.channels.column_names(name) {
            let column = match kind {
                ChannelKind::Values => {
                    let cells: Vec<Cell> = grid
                        .column(index)
                        .map(|raw| plan.value_cell(raw, self.recognizer))
                        .collect();
                    for cell in &cells {
                        counts.record(cell);
                    }
                    plan.values_column(cells)?
                }
                ChannelKind::Missing => {
                    let cells: Vec<Cell> = grid
                        .column(index)
                        .map(|raw| missing_cell(raw, self.recognizer))
                        .collect();
                    plan.missing_column(cells, self.recognizer)?
                }
            };
            columns.push((column_name, column));
        }
        if !self.channels.contains(ChannelKind::Values) {
            for raw in grid.column(index) {
                counts.record(&plan.value_cell(raw, self.recognizer));
            }
        }
        debug!(
            present = counts.present,
            declared_missing = counts.declared_missing,
            invalid = counts.invalid,
            out_of_domain = counts.out_of_domain,
            "field split"
        );
        Ok(FieldOutput {
            source: name.to_string(),
            columns,
            counts,
            warnings,
        })
    }
}

struct FieldOutput {
    source: String,
    columns: Vec<(String, LabelledColumn)>,
    counts: CellCounts,
    warnings: Vec<SchemaWarning>,
}

/// A field schema resolved against the recognizer.
struct FieldPlan {
    value_type: ValueType,
    domain: Option<Arc<[Value]>>,
    members: Option<BTreeSet<Value>>,
    value_labels: Arc<LabelMap>,
    missing_labels: Arc<LabelMap>,
    variable_label: Option<String>,
    ordered: bool,
}

impl FieldPlan {
    fn compile(
        field: &FieldSchema,
        recognizer: &MissingRecognizer,
        strict: bool,
    ) -> Result<(Self, Vec<SchemaWarning>)> {
        let value_type = field.value_type();
        let domain = field.typed_domain()?;
        if let Some(domain) = &domain {
            recognizer.check_domain(&field.name, value_type, domain)?;
        }
        let members: Option<BTreeSet<Value>> =
            domain.as_ref().map(|domain| domain.iter().cloned().collect());

        let mut value_labels = LabelMap::new();
        let mut missing_labels = LabelMap::new();
        let mut warnings = Vec::new();
        for (token, label) in &field.labels {
            if let Some(reason) = recognizer.reason(token) {
                missing_labels.insert(Value::Text(reason.to_string()), label.clone());
                continue;
            }
            let value = value_type.parse(token).filter(|value| {
                members
                    .as_ref()
                    .is_none_or(|members| members.contains(value))
            });
            match value {
                Some(value) => value_labels.insert(value, label.clone()),
                None if strict => {
                    return Err(LabelledError::InvalidSchema {
                        field: field.name.clone(),
                        message: format!(
                            "label key '{token}' matches neither a domain member nor a missing token"
                        ),
                    });
                }
                None => {
                    let warning = SchemaWarning {
                        field: field.name.clone(),
                        kind: WarningKind::SchemaLabelDomainMismatch,
                        token: token.clone(),
                    };
                    warn!(field = %field.name, token = %token, "{warning}");
                    warnings.push(warning);
                }
            }
        }

        let plan = Self {
            value_type,
            domain: domain.map(Into::into),
            members,
            value_labels: Arc::new(value_labels),
            missing_labels: Arc::new(missing_labels),
            variable_label: field.description.clone(),
            ordered: field.ordered,
        };
        Ok((plan, warnings))
    }

    fn value_cell(&self, raw: &str, recognizer: &MissingRecognizer) -> Cell {
        if recognizer.classify(raw).is_missing() {
            return Cell::Missing(Missing::Declared);
        }
        match self.value_type.parse(raw) {
            None => Cell::Missing(Missing::Invalid(raw.to_string())),
            Some(value) => match &self.members {
                Some(members) if !members.contains(&value) => {
                    Cell::Missing(Missing::OutOfDomain(raw.to_string()))
                }
                _ => Cell::Value(value),
            },
        }
    }

    fn values_column(&self, cells: Vec<Cell>) -> Result<LabelledColumn> {
        let mut builder = LabelledColumn::builder(ColumnType::Plain(self.value_type))
            .cells(cells)
            .labels(Arc::clone(&self.value_labels))
            .variable_label(self.variable_label.clone())
            .ordered(self.ordered);
        if let Some(domain) = &self.domain {
            builder = builder.domain(Arc::clone(domain));
        }
        builder.build()
    }

    fn missing_column(
        &self,
        cells: Vec<Cell>,
        recognizer: &MissingRecognizer,
    ) -> Result<LabelledColumn> {
        let reasons: Vec<Value> = recognizer
            .reasons()
            .into_iter()
            .map(|reason| Value::Text(reason.to_string()))
            .collect();
        LabelledColumn::builder(ColumnType::Plain(ValueType::Text))
            .cells(cells)
            .domain(reasons)
            .labels(Arc::clone(&self.missing_labels))
            .variable_label(self.variable_label.clone())
            .build()
    }
}

fn missing_cell(raw: &str, recognizer: &MissingRecognizer) -> Cell {
    match recognizer.classify_tagged(raw) {
        Classification::Missing(Some(reason)) => Cell::Value(Value::Text(reason.to_string())),
        Classification::Missing(None) => Cell::Missing(Missing::Declared),
        Classification::Present => Cell::Missing(Missing::Absent),
    }
}
