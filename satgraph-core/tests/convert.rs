//! End-to-end tests for the conversion pipeline.

use std::time::Duration;

use rstest::rstest;
use satgraph_core::{
    ConvertError, Converter, ConverterBuilder, LABEL_FORCED_FALSE, LABEL_FORCED_TRUE,
    LABEL_UNKNOWN, NodeKind,
};

fn converter() -> Converter {
    ConverterBuilder::new().build()
}

#[test]
fn two_clause_formula_becomes_one_rooted_sample() {
    let samples = converter()
        .convert("p cnf 2 2\n1 2 0\n-1 -2 0\n", "1 0\n")
        .expect("conversion must succeed");
    assert_eq!(samples.len(), 1);

    let sample = &samples[0];
    assert_eq!(sample.var_count(), 2);
    assert_eq!(sample.node_count(), 5);
    assert_eq!(sample.labels(), &[LABEL_FORCED_TRUE, LABEL_UNKNOWN]);
    assert_eq!(sample.node_to_var(), &[1, 2]);

    let kinds = sample.kinds();
    assert_eq!(
        kinds,
        &[
            NodeKind::Variable,
            NodeKind::Variable,
            NodeKind::Clause,
            NodeKind::Clause,
            NodeKind::Root,
        ]
    );
}

#[test]
fn disjoint_unit_clauses_become_two_samples() {
    let samples = converter()
        .convert("p cnf 2 2\n1 0\n2 0\n", "1 0\n-2 0\n")
        .expect("conversion must succeed");
    assert_eq!(samples.len(), 2);
    for sample in &samples {
        assert_eq!(sample.var_count(), 1);
        assert_eq!(sample.node_count(), 3);
    }
    assert_eq!(samples[0].labels(), &[LABEL_FORCED_TRUE]);
    assert_eq!(samples[1].labels(), &[LABEL_FORCED_FALSE]);
}

#[test]
fn zero_only_backbone_is_reported_as_empty() {
    let err = converter()
        .convert("1 2 0\n-1 -2 0\n", "0\n0\n0\n")
        .expect_err("zero-only backbone must fail");
    assert_eq!(err, ConvertError::EmptyBackbone);
}

#[test]
fn exhausted_budget_is_reported_as_timeout() {
    let strict = ConverterBuilder::new()
        .with_timeout(Duration::ZERO)
        .build();
    let err = strict
        .convert("1 2 0\n-1 -2 0\n", "1 0\n")
        .expect_err("zero budget must fail");
    assert!(matches!(err, ConvertError::Timeout { .. }));
}

#[test]
fn single_component_split_preserves_node_and_edge_order() {
    let cnf = "1 2 0\n2 3 0\n-3 1 0\n";
    let samples = converter()
        .convert(cnf, "2 0\n")
        .expect("conversion must succeed");
    assert_eq!(samples.len(), 1);

    let sample = &samples[0];
    // Variables 1, 2, 3 in first-encounter order, then the three clauses.
    assert_eq!(sample.node_to_var(), &[1, 2, 3]);
    let literal_edges = &sample.edges()[..6];
    assert_eq!(
        literal_edges,
        &[(0, 3), (1, 3), (1, 4), (2, 4), (2, 5), (0, 5)]
    );
    // Root edges follow, one per clause node.
    assert_eq!(&sample.edges()[6..], &[(6, 3), (6, 4), (6, 5)]);
    assert_eq!(&sample.attrs()[..6], &[1, 1, 1, 1, -1, 1]);
    assert_eq!(&sample.attrs()[6..], &[0, 0, 0]);
}

#[test]
fn conversion_is_idempotent_down_to_the_serialized_bytes() {
    let cnf = "1 2 0\n3 0\n-1 -2 0\n4 5 0\n";
    let backbone = "1 0\n3 0\n-4 0\n";

    let first = converter()
        .convert(cnf, backbone)
        .expect("conversion must succeed");
    let second = converter()
        .convert(cnf, backbone)
        .expect("conversion must succeed");
    assert_eq!(first, second);

    let encode = |samples: &[satgraph_core::GraphSample]| -> Vec<String> {
        samples
            .iter()
            .map(|sample| {
                let record = sample.to_record().expect("record must convert");
                serde_json::to_string(&record).expect("record must encode")
            })
            .collect()
    };
    assert_eq!(encode(&first), encode(&second));
}

#[test]
fn no_variable_lands_in_two_samples() {
    let cnf = "1 2 0\n3 4 0\n5 0\n-1 2 0\n";
    let samples = converter()
        .convert(cnf, "1 0\n3 0\n5 0\n")
        .expect("conversion must succeed");
    assert!(samples.len() > 1);

    let mut seen = std::collections::HashSet::new();
    for sample in &samples {
        for &variable in sample.node_to_var() {
            assert!(seen.insert(variable), "variable {variable} appears twice");
        }
    }
}

#[rstest]
#[case::bad_cnf_token("1 x 0\n", "1 0\n")]
#[case::bad_backbone_token("1 2 0\n", "y\n")]
fn malformed_input_is_a_parse_failure(#[case] cnf: &str, #[case] backbone: &str) {
    let err = converter()
        .convert(cnf, backbone)
        .expect_err("malformed input must fail");
    assert!(matches!(err, ConvertError::Parse { .. }));
}

#[test]
fn conflicting_backbone_is_rejected_before_building() {
    let err = converter()
        .convert("1 2 0\n", "1 0\n-1 0\n")
        .expect_err("conflicting backbone must fail");
    assert!(matches!(
        err,
        ConvertError::Parse {
            source: satgraph_core::ParseError::ConflictingBackbone { variable: 1 },
        }
    ));
}
