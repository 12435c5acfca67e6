//! Property tests for the conversion pipeline.

use std::collections::HashSet;

use proptest::prelude::*;
use satgraph_core::{ConverterBuilder, Lit};

fn literal() -> impl Strategy<Value = Lit> {
    (1i32..=6, any::<bool>()).prop_map(|(var, positive)| if positive { var } else { -var })
}

fn formula() -> impl Strategy<Value = Vec<Vec<Lit>>> {
    prop::collection::vec(prop::collection::vec(literal(), 1..4), 1..8)
}

fn render_cnf(clauses: &[Vec<Lit>]) -> String {
    let mut text = String::from("p cnf 6 8\n");
    for clause in clauses {
        for lit in clause {
            text.push_str(&lit.to_string());
            text.push(' ');
        }
        text.push_str("0\n");
    }
    text
}

/// A backbone forcing the first literal of the first clause: always present
/// in the formula, so conversion cannot reject it as irrelevant.
fn render_backbone(clauses: &[Vec<Lit>]) -> String {
    format!("{} 0\n", clauses[0][0])
}

proptest! {
    #[test]
    fn conversion_is_deterministic(clauses in formula()) {
        let cnf = render_cnf(&clauses);
        let backbone = render_backbone(&clauses);
        let converter = ConverterBuilder::new().build();

        let first = converter.convert(&cnf, &backbone);
        let second = converter.convert(&cnf, &backbone);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn samples_obey_structural_laws(clauses in formula()) {
        let cnf = render_cnf(&clauses);
        let backbone = render_backbone(&clauses);
        let converter = ConverterBuilder::new().build();

        let samples = converter
            .convert(&cnf, &backbone)
            .expect("a present backbone variable must convert");

        let mut seen_variables = HashSet::new();
        for sample in &samples {
            prop_assert_eq!(sample.edges().len(), sample.attrs().len());
            prop_assert_eq!(sample.labels().len(), sample.var_count());
            prop_assert_eq!(sample.node_to_var().len(), sample.var_count());

            // Every node id stays inside the sample's contiguous space.
            let nodes = sample.node_count();
            for &(u, v) in sample.edges() {
                prop_assert!(u < nodes && v < nodes);
            }

            // The serialized form doubles both parallel lists in step.
            let record = sample.to_record().expect("record must convert");
            prop_assert_eq!(record.edge_index.len(), sample.edges().len() * 2);
            prop_assert_eq!(record.edge_index.len(), record.edge_attr.len());

            // No variable may appear in two retained samples.
            for &variable in sample.node_to_var() {
                prop_assert!(seen_variables.insert(variable));
            }
        }
    }
}
