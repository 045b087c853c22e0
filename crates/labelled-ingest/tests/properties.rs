//! Property tests for the channel splitter.

use std::collections::BTreeSet;

use proptest::prelude::*;

use labelled_ingest::{ChannelKind, ChannelRequest, ChannelSpec, MissingRecognizer, RawGrid, split};
use labelled_model::{FieldSchema, FieldType, TableSchema, Value, parse_i64};

const NA_TOKENS: [&str; 2] = ["-99", "NA"];

fn raw_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (0i64..8).prop_map(|value| value.to_string()),
        1 => Just("-99".to_string()),
        1 => Just("NA".to_string()),
        1 => Just("x".to_string()),
        1 => Just(String::new()),
    ]
}

fn raw_column() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(raw_cell(), 0..24)
}

fn domain() -> impl Strategy<Value = Option<BTreeSet<i64>>> {
    prop::option::of(prop::collection::btree_set(0i64..8, 1..6))
}

fn grid(cells: &[String]) -> RawGrid {
    RawGrid::new(
        vec!["q".to_string()],
        cells.iter().map(|cell| vec![cell.clone()]).collect(),
    )
}

fn schema(domain: Option<&BTreeSet<i64>>) -> TableSchema {
    let mut field = FieldSchema::new("q", FieldType::Integer).with_label("-99", "Refused");
    if let Some(domain) = domain {
        field = field.with_domain(domain.iter().map(ToString::to_string));
    }
    TableSchema::new(vec![field])
}

proptest! {
    #[test]
    fn values_channel_matches_typed_parse(cells in raw_column(), domain in domain()) {
        let recognizer = MissingRecognizer::new(NA_TOKENS);
        let table = split(&grid(&cells), &schema(domain.as_ref()), &recognizer, &ChannelSpec::values())
            .expect("split");
        let column = table.column("q").expect("q");
        for (index, raw) in cells.iter().enumerate() {
            let expected = if NA_TOKENS.contains(&raw.as_str()) {
                None
            } else {
                parse_i64(raw).filter(|value| {
                    domain.as_ref().is_none_or(|domain| domain.contains(value))
                })
            };
            let expected = expected.map(Value::Integer);
            prop_assert_eq!(column.value(index), expected.as_ref());
        }
    }

    #[test]
    fn two_channel_split_projects_to_single_channels(cells in raw_column(), domain in domain()) {
        let recognizer = MissingRecognizer::new(NA_TOKENS);
        let grid = grid(&cells);
        let schema = schema(domain.as_ref());
        let both = split(&grid, &schema, &recognizer, &ChannelSpec::values_and_missing())
            .expect("split both");

        for (kind, name) in [(ChannelKind::Values, "q_values"), (ChannelKind::Missing, "q_missing")] {
            let single = split(
                &grid,
                &schema,
                &recognizer,
                &ChannelSpec::new(vec![ChannelRequest::new(kind)]).expect("spec"),
            )
            .expect("split single");
            let projected = both
                .select(&[name])
                .and_then(|table| table.rename(name, "q"))
                .expect("project");
            prop_assert_eq!(projected, single);
        }
    }

    #[test]
    fn output_names_follow_suffix_rule(
        kinds in prop::sample::subsequence(vec![ChannelKind::Values, ChannelKind::Missing], 1..=2),
        reversed in any::<bool>(),
        explicit in prop::option::of("_[a-z]{1,4}"),
    ) {
        let mut kinds = kinds;
        if reversed {
            kinds.reverse();
        }
        let requests: Vec<ChannelRequest> = kinds
            .iter()
            .enumerate()
            .map(|(position, kind)| match &explicit {
                Some(suffix) if position == 0 => ChannelRequest::new(*kind).with_suffix(suffix.clone()),
                _ => ChannelRequest::new(*kind),
            })
            .collect();
        let spec = ChannelSpec::new(requests.clone()).expect("spec");
        let names = spec.column_names("q");
        prop_assert_eq!(names.len(), requests.len());
        for (request, (kind, name)) in requests.iter().zip(&names) {
            prop_assert_eq!(*kind, request.kind);
            let expected = match (&request.suffix, requests.len()) {
                (Some(suffix), _) => format!("q{suffix}"),
                (None, 1) => "q".to_string(),
                (None, _) => format!("q{}", request.kind.default_suffix()),
            };
            prop_assert_eq!(name, &expected);
        }
    }

    #[test]
    fn declared_domain_is_independent_of_observations(
        cells in raw_column(),
        domain in prop::collection::btree_set(0i64..8, 1..6),
    ) {
        let recognizer = MissingRecognizer::new(NA_TOKENS);
        let table = split(&grid(&cells), &schema(Some(&domain)), &recognizer, &ChannelSpec::values_and_missing())
            .expect("split");
        let column = table.column("q_values").expect("q_values");
        let expected: Vec<Value> = domain.iter().copied().map(Value::Integer).collect();
        prop_assert_eq!(column.declared_domain(), Some(&expected[..]));
        for value in column.observed_values() {
            prop_assert!(expected.contains(&value));
        }
    }
}
