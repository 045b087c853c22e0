//! Label transforms over columns and whole tables.
//!
//! Table forms apply the column transform to every column and keep the
//! table's names, order and height. They go through [`Table::map_columns`],
//! so they return the table's row-count check as a `Result`.

use labelled_model::{FactorLevels, LabelledColumn, Result, Table};

use crate::factor;
use crate::labels;

/// Label transforms shared by columns and tables.
///
/// None of the transforms mutate their input.
pub trait LabelTransform {
    type Output;

    #[must_use]
    fn apply_labels(&self) -> Self::Output;

    #[must_use]
    fn zap_labels(&self) -> Self::Output;

    #[must_use]
    fn as_factor(&self, levels: FactorLevels) -> Self::Output;
}

impl LabelTransform for LabelledColumn {
    type Output = LabelledColumn;

    fn apply_labels(&self) -> LabelledColumn {
        labels::apply_labels(self)
    }

    fn zap_labels(&self) -> LabelledColumn {
        labels::zap_labels(self)
    }

    fn as_factor(&self, levels: FactorLevels) -> LabelledColumn {
        factor::as_factor(self, levels)
    }
}

impl LabelTransform for Table {
    type Output = Result<Table>;

    fn apply_labels(&self) -> Result<Table> {
        self.map_columns(labels::apply_labels)
    }

    fn zap_labels(&self) -> Result<Table> {
        self.map_columns(labels::zap_labels)
    }

    fn as_factor(&self, levels: FactorLevels) -> Result<Table> {
        self.map_columns(|column| factor::as_factor(column, levels))
    }
}

/// Show labels in place of labelled values.
pub fn apply_labels<T: LabelTransform>(target: &T) -> T::Output {
    target.apply_labels()
}

/// Remove labels, keeping declared domains.
pub fn zap_labels<T: LabelTransform>(target: &T) -> T::Output {
    target.zap_labels()
}

/// Materialise categorical factors.
pub fn as_factor<T: LabelTransform>(target: &T, levels: FactorLevels) -> T::Output {
    target.as_factor(levels)
}
