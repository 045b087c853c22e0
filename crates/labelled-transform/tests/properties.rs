//! Property tests for label transforms.

use proptest::prelude::*;

use labelled_model::{ColumnType, FactorLevels, LabelMap, LabelledColumn, Value, ValueType};
use labelled_transform::{apply_labels, as_factor, zap_labels};

fn factor_levels() -> impl Strategy<Value = FactorLevels> {
    prop_oneof![Just(FactorLevels::Values), Just(FactorLevels::Labels)]
}

prop_compose! {
    fn labelled_column()(
        domain in prop::option::of(prop::collection::btree_set(0i64..10, 1..6)),
        labels in prop::collection::btree_map(0i64..12, "[A-Z][a-z]{0,5}", 0..4),
        picks in prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 0..16),
    ) -> LabelledColumn {
        let members: Vec<i64> = match &domain {
            Some(domain) => domain.iter().copied().collect(),
            None => (0..10).collect(),
        };
        let cells: Vec<Option<i64>> = picks
            .iter()
            .map(|pick| pick.as_ref().map(|index| *index.get(&members)))
            .collect();
        let mut builder = LabelledColumn::builder(ColumnType::Plain(ValueType::Integer))
            .cells(cells)
            .labels(labels.into_iter().map(|(key, label)| (Value::Integer(key), label)).collect::<LabelMap>());
        if let Some(domain) = domain {
            builder = builder.domain(domain.into_iter().map(Value::Integer).collect::<Vec<_>>());
        }
        builder.build().expect("column")
    }
}

proptest! {
    #[test]
    fn apply_labels_is_idempotent(column in labelled_column()) {
        let once = apply_labels(&column);
        prop_assert_eq!(apply_labels(&once), once.clone());
        prop_assert_eq!(once.values().collect::<Vec<_>>(), column.values().collect::<Vec<_>>());
    }

    #[test]
    fn apply_labels_is_idempotent_on_factors(column in labelled_column(), levels in factor_levels()) {
        let factor = as_factor(&column, levels);
        prop_assert_eq!(apply_labels(&factor), factor);
    }

    #[test]
    fn zap_preserves_factor_domain(column in labelled_column(), levels in factor_levels()) {
        let factor = as_factor(&column, levels);
        let zapped = zap_labels(&factor);
        prop_assert_eq!(zapped.declared_domain(), factor.declared_domain());
        prop_assert!(zapped.label_map().is_empty());
    }

    #[test]
    fn factor_domain_covers_declared_members(column in labelled_column(), levels in factor_levels()) {
        let factor = as_factor(&column, levels);
        let factor_domain = factor.declared_domain().expect("factor domain");
        for member in column.declared_domain().unwrap_or_default() {
            prop_assert!(factor_domain.contains(member));
        }
        for value in column.label_map().values() {
            prop_assert!(factor_domain.contains(value));
        }
        prop_assert_eq!(factor.len(), column.len());
    }

    #[test]
    fn value_factor_preserves_values(column in labelled_column()) {
        let factor = as_factor(&column, FactorLevels::Values);
        prop_assert_eq!(factor.values().collect::<Vec<_>>(), column.values().collect::<Vec<_>>());
    }
}
