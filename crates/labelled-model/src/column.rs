//! Labelled columns.
//!
//! A [`LabelledColumn`] keeps three facets of a field apart: the typed
//! entries, an optional declared domain (the complete enumeration from the
//! schema, observed or not) and a value-to-label map. Its
//! [`Representation`] records how entries are surfaced to consumers:
//!
//! - `Raw`: the typed value
//! - `Labelled`: the label text where one exists, the typed value otherwise
//! - `Factor`: a categorical level, displayed per [`FactorLevels`]
//!
//! Columns are immutable. Derived columns share the entry, domain and label
//! storage of their source through `Arc`.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Missing};
use crate::error::{LabelledError, Result};
use crate::value::{Value, ValueType};

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value_type", rename_all = "snake_case")]
pub enum ColumnType {
    /// Entries are [`Cell::Value`]s of one type.
    Plain(ValueType),
    /// Entries are [`Cell::Level`] indexes into the declared domain.
    Categorical(ValueType),
}

impl ColumnType {
    pub fn value_type(&self) -> ValueType {
        match self {
            ColumnType::Plain(value_type) | ColumnType::Categorical(value_type) => *value_type,
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::Categorical(_))
    }
}

/// Which text a factor level displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorLevels {
    /// Label text for labelled members, the raw value for the rest.
    #[default]
    Values,
    /// Label text only. Entries without a label become missing.
    Labels,
}

impl FactorLevels {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorLevels::Values => "values",
            FactorLevels::Labels => "labels",
        }
    }
}

impl fmt::Display for FactorLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactorLevels {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "values" => Ok(FactorLevels::Values),
            "labels" => Ok(FactorLevels::Labels),
            _ => Err(format!("Unknown factor levels: {s}")),
        }
    }
}

/// How a column surfaces its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "levels", rename_all = "snake_case")]
pub enum Representation {
    #[default]
    Raw,
    Labelled,
    Factor(FactorLevels),
}

/// Typed value to label text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    labels: BTreeMap<Value, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, replacing any previous label for the value.
    pub fn insert(&mut self, value: Value, label: impl Into<String>) {
        self.labels.insert(value, label.into());
    }

    #[must_use]
    pub fn with(mut self, value: impl Into<Value>, label: impl Into<String>) -> Self {
        self.insert(value.into(), label);
        self
    }

    pub fn get(&self, value: &Value) -> Option<&str> {
        self.labels.get(value).map(String::as_str)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.labels.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in value order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &str)> {
        self.labels
            .iter()
            .map(|(value, label)| (value, label.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.labels.keys()
    }
}

impl FromIterator<(Value, String)> for LabelMap {
    fn from_iter<T: IntoIterator<Item = (Value, String)>>(iter: T) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

/// A typed column with its declared domain, labels and variable label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledColumn {
    column_type: ColumnType,
    cells: Arc<[Cell]>,
    declared_domain: Option<Arc<[Value]>>,
    label_map: Arc<LabelMap>,
    variable_label: Option<String>,
    ordered: bool,
    representation: Representation,
}

impl LabelledColumn {
    pub fn builder(column_type: ColumnType) -> ColumnBuilder {
        ColumnBuilder::new(column_type)
    }

    /// Unlabelled column without a declared domain.
    ///
    /// # Errors
    ///
    /// Returns [`LabelledError::TypeMismatch`] if a value is not of `value_type`.
    pub fn plain<I, C>(value_type: ValueType, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        Self::builder(ColumnType::Plain(value_type))
            .cells(cells)
            .build()
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn value_type(&self) -> ValueType {
        self.column_type.value_type()
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Typed value of entry `index`, resolving categorical levels.
    pub fn value(&self, index: usize) -> Option<&Value> {
        match self.cells.get(index)? {
            Cell::Value(value) => Some(value),
            Cell::Level(level) => self.declared_domain.as_ref()?.get(*level),
            Cell::Missing(_) => None,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = Option<&Value>> + '_ {
        (0..self.len()).map(|index| self.value(index))
    }

    pub fn declared_domain(&self) -> Option<&[Value]> {
        self.declared_domain.as_deref()
    }

    pub fn label_map(&self) -> &LabelMap {
        &self.label_map
    }

    pub fn variable_label(&self) -> Option<&str> {
        self.variable_label.as_deref()
    }

    pub fn ordered(&self) -> bool {
        self.ordered
    }

    /// True when the column carries labels or a declared domain.
    pub fn is_labelled(&self) -> bool {
        !self.label_map.is_empty() || self.declared_domain.is_some()
    }

    pub fn shared_cells(&self) -> Arc<[Cell]> {
        Arc::clone(&self.cells)
    }

    pub fn shared_domain(&self) -> Option<Arc<[Value]>> {
        self.declared_domain.clone()
    }

    pub fn shared_labels(&self) -> Arc<LabelMap> {
        Arc::clone(&self.label_map)
    }

    /// Surface text of entry `index`, or `None` when the entry is missing.
    pub fn display(&self, index: usize) -> Option<Cow<'_, str>> {
        let value = self.value(index)?;
        self.display_value(value)
    }

    /// Surface text of every entry.
    pub fn displays(&self) -> Vec<Option<Cow<'_, str>>> {
        (0..self.len()).map(|index| self.display(index)).collect()
    }

    fn display_value<'a>(&'a self, value: &'a Value) -> Option<Cow<'a, str>> {
        let label = self.label_map.get(value);
        match (self.representation, label) {
            (Representation::Raw, _) => Some(raw_text(value)),
            (Representation::Labelled | Representation::Factor(_), Some(label)) => {
                Some(Cow::Borrowed(label))
            }
            (Representation::Labelled | Representation::Factor(FactorLevels::Values), None) => {
                Some(raw_text(value))
            }
            (Representation::Factor(FactorLevels::Labels), None) => None,
        }
    }

    /// Display names of the categorical levels, in level order.
    ///
    /// Empty for non-categorical columns. Label-only factors list each label
    /// once and skip members without a label.
    pub fn levels(&self) -> Vec<String> {
        let Some(domain) = self.declared_domain.as_deref() else {
            return Vec::new();
        };
        if !self.column_type.is_categorical() {
            return Vec::new();
        }
        let mut seen = BTreeSet::new();
        domain
            .iter()
            .filter_map(|member| self.display_value(member))
            .map(Cow::into_owned)
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    /// Distinct values present in the column, in value order.
    pub fn observed_values(&self) -> BTreeSet<Value> {
        self.values().flatten().cloned().collect()
    }

    /// Declared domain members that no entry exhibits.
    pub fn unobserved_members(&self) -> Vec<Value> {
        let observed = self.observed_values();
        self.declared_domain()
            .unwrap_or_default()
            .iter()
            .filter(|member| !observed.contains(*member))
            .cloned()
            .collect()
    }

    /// Same entries and domain, different representation.
    #[must_use]
    pub fn with_representation(&self, representation: Representation) -> Self {
        Self {
            representation,
            ..self.clone()
        }
    }

    /// Same entries and domain, with no labels.
    #[must_use]
    pub fn without_labels(&self) -> Self {
        Self {
            label_map: Arc::new(LabelMap::new()),
            ..self.clone()
        }
    }

    /// Categorical column over `levels`, displayed per `mode`.
    ///
    /// Levels of another type and repeated levels are skipped. Entries whose
    /// value is not a level, or has no label under [`FactorLevels::Labels`],
    /// become [`Missing::Unlabelled`]. Missing entries keep their kind.
    /// Labels, variable label and ordering flag are shared with `self`, and
    /// so is the declared domain when it already equals the level set.
    #[must_use]
    pub fn with_levels(&self, levels: Vec<Value>, mode: FactorLevels) -> Self {
        let value_type = self.value_type();
        let mut seen = BTreeSet::new();
        let levels: Vec<Value> = levels
            .into_iter()
            .filter(|level| level.value_type() == value_type && seen.insert(level.clone()))
            .collect();
        let cells: Vec<Cell> = {
            let index: BTreeMap<&Value, usize> = levels
                .iter()
                .enumerate()
                .map(|(position, level)| (level, position))
                .collect();
            let labels_only = mode == FactorLevels::Labels;
            self.cells
                .iter()
                .enumerate()
                .map(|(row, cell)| match (self.value(row), cell) {
                    (Some(value), _) => match index.get(value) {
                        Some(level) if !labels_only || self.label_map.contains(value) => {
                            Cell::Level(*level)
                        }
                        _ => Cell::Missing(Missing::Unlabelled),
                    },
                    (None, Cell::Missing(missing)) => Cell::Missing(missing.clone()),
                    (None, _) => Cell::missing(),
                })
                .collect()
        };
        let declared_domain = match &self.declared_domain {
            Some(domain) if domain.as_ref() == levels.as_slice() => Arc::clone(domain),
            _ => Arc::from(levels),
        };
        Self {
            column_type: ColumnType::Categorical(value_type),
            cells: cells.into(),
            declared_domain: Some(declared_domain),
            label_map: Arc::clone(&self.label_map),
            variable_label: self.variable_label.clone(),
            ordered: self.ordered,
            representation: Representation::Factor(mode),
        }
    }
}

fn raw_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Text(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

/// Validating constructor for [`LabelledColumn`].
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    column_type: ColumnType,
    cells: Vec<Cell>,
    declared_domain: Option<Arc<[Value]>>,
    label_map: Arc<LabelMap>,
    variable_label: Option<String>,
    ordered: bool,
    representation: Representation,
}

impl ColumnBuilder {
    fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            cells: Vec::new(),
            declared_domain: None,
            label_map: Arc::new(LabelMap::new()),
            variable_label: None,
            ordered: false,
            representation: Representation::Raw,
        }
    }

    #[must_use]
    pub fn cells<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.cells = cells.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<Arc<[Value]>>) -> Self {
        self.declared_domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn labels(mut self, labels: impl Into<Arc<LabelMap>>) -> Self {
        self.label_map = labels.into();
        self
    }

    #[must_use]
    pub fn variable_label(mut self, label: Option<String>) -> Self {
        self.variable_label = label;
        self
    }

    #[must_use]
    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    #[must_use]
    pub fn representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    /// Check the column invariants and build.
    ///
    /// # Errors
    ///
    /// - [`LabelledError::TypeMismatch`] for values, domain members or label keys of the wrong type
    /// - [`LabelledError::ValueOutsideDomain`] for values absent from the declared domain
    /// - [`LabelledError::LevelOutOfRange`] for bad level indexes, or levels in a plain column
    pub fn build(self) -> Result<LabelledColumn> {
        let value_type = self.column_type.value_type();
        let domain = self.declared_domain.as_deref();
        for member in domain.unwrap_or_default() {
            check_type(member, value_type)?;
        }
        for key in self.label_map.values() {
            check_type(key, value_type)?;
        }
        let members: Option<BTreeSet<&Value>> = domain.map(|domain| domain.iter().collect());
        for cell in &self.cells {
            match cell {
                Cell::Value(value) => {
                    check_type(value, value_type)?;
                    if self.column_type.is_categorical() {
                        return Err(LabelledError::TypeMismatch {
                            value: value.to_string(),
                            expected: "categorical level".to_string(),
                        });
                    }
                    if let Some(members) = &members
                        && !members.contains(value)
                    {
                        return Err(LabelledError::ValueOutsideDomain {
                            value: value.to_string(),
                        });
                    }
                }
                Cell::Level(level) => {
                    let levels = match (self.column_type, domain) {
                        (ColumnType::Categorical(_), Some(domain)) => domain.len(),
                        _ => 0,
                    };
                    if *level >= levels {
                        return Err(LabelledError::LevelOutOfRange {
                            index: *level,
                            levels,
                        });
                    }
                }
                Cell::Missing(_) => {}
            }
        }
        Ok(LabelledColumn {
            column_type: self.column_type,
            cells: self.cells.into(),
            declared_domain: self.declared_domain,
            label_map: self.label_map,
            variable_label: self.variable_label,
            ordered: self.ordered,
            representation: self.representation,
        })
    }
}

fn check_type(value: &Value, value_type: ValueType) -> Result<()> {
    if value.value_type() == value_type {
        Ok(())
    } else {
        Err(LabelledError::TypeMismatch {
            value: value.to_string(),
            expected: value_type.to_string(),
        })
    }
}
