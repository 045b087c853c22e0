//! Factor materialisation.
//!
//! [`as_factor`] turns a column into a categorical one whose levels are the
//! declared domain followed by any labelled values the domain lacks. Without
//! a declared domain the levels are the observed values together with the
//! labelled values, in value order.
//!
//! With [`FactorLevels::Labels`] only label text is displayed: entries whose
//! value has no label become [`Missing::Unlabelled`]. This conversion is
//! lossy and never an error.

use std::collections::BTreeSet;

use tracing::debug;

use labelled_model::{Cell, FactorLevels, LabelledColumn, Missing, Representation, Value};

/// Materialise `column` as a factor displaying `levels`.
pub fn as_factor(column: &LabelledColumn, levels: FactorLevels) -> LabelledColumn {
    if column.representation() == Representation::Factor(levels) {
        return column.clone();
    }
    let level_set = factor_levels(column);
    let factor = column.with_levels(level_set, levels);
    debug!(
        levels = factor.declared_domain().map_or(0, <[_]>::len),
        unlabelled = factor
            .cells()
            .iter()
            .filter(|cell| matches!(cell, Cell::Missing(Missing::Unlabelled)))
            .count(),
        mode = %levels,
        "materialised factor"
    );
    factor
}

/// Level set of the factor built from `column`.
fn factor_levels(column: &LabelledColumn) -> Vec<Value> {
    match column.declared_domain() {
        Some(domain) => {
            let members: BTreeSet<&Value> = domain.iter().collect();
            let extra: BTreeSet<&Value> = column
                .label_map()
                .values()
                .filter(|value| !members.contains(value))
                .collect();
            domain.iter().chain(extra).cloned().collect()
        }
        None => {
            let mut values = column.observed_values();
            values.extend(column.label_map().values().cloned());
            values.into_iter().collect()
        }
    }
}
