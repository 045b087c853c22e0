//! Label overlay and removal.

use labelled_model::{LabelledColumn, Representation};

/// Switch a column to its labelled overlay.
///
/// Entries whose value has a label display the label; the typed values,
/// domain and label map are untouched. Columns already showing labels
/// (labelled overlay or factor) are returned as they are.
pub fn apply_labels(column: &LabelledColumn) -> LabelledColumn {
    match column.representation() {
        Representation::Raw => column.with_representation(Representation::Labelled),
        Representation::Labelled | Representation::Factor(_) => column.clone(),
    }
}

/// Remove the labels and show raw values again.
///
/// The declared domain and categorical type are kept, so a zapped factor
/// still enumerates every level.
pub fn zap_labels(column: &LabelledColumn) -> LabelledColumn {
    column
        .without_labels()
        .with_representation(Representation::Raw)
}
