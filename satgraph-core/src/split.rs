//! Component splitting, relabeling, and root injection.
//!
//! A formula whose bipartite graph is weakly connected becomes a single
//! sample; a disconnected one is sliced into independent samples, each
//! relabeled to a contiguous id space with variables first. Every sample
//! receives a synthetic root node connected to each of its clause nodes so
//! the sample is connected even when the formula structure is sparse.

use std::collections::HashMap;

use tracing::debug;

use crate::deadline::{Deadline, Phase};
use crate::error::ConvertError;
use crate::forest::Component;
use crate::graph::{ATTR_ROOT, LABEL_FORCED_FALSE, LABEL_FORCED_TRUE, NodeKind, UnifiedGraph};
use crate::sample::GraphSample;

/// Components with fewer members than this carry no edge and are dropped.
const MIN_COMPONENT_MEMBERS: usize = 2;

impl UnifiedGraph {
    /// Splits the graph into one sample per surviving weakly-connected
    /// component.
    ///
    /// With exactly one component the node and edge order of the unified
    /// graph is preserved; only the root node and its edges are appended.
    /// With several components, each is relabeled to contiguous ids in
    /// ascending original-id order, and components that are singletons or
    /// whose restricted labels carry neither a forced-true nor a
    /// forced-false value are dropped.
    ///
    /// # Errors
    /// Returns [`ConvertError::Inconsistency`] when an edge endpoint is
    /// missing from its component's relabel map (a splitter or forest bug,
    /// surfaced loudly rather than skipped) and [`ConvertError::Timeout`]
    /// when `deadline` expires.
    pub fn into_samples(mut self, deadline: &Deadline) -> Result<Vec<GraphSample>, ConvertError> {
        let components = self.forest.components(deadline)?;
        deadline.check(Phase::Split)?;

        if components.len() == 1 {
            return Ok(vec![self.into_whole_sample()]);
        }

        let mut samples = Vec::new();
        for component in components {
            deadline.check(Phase::Split)?;
            if let Some(sample) = self.component_sample(&component)? {
                samples.push(sample);
            }
        }
        debug!(samples = samples.len(), "split disconnected graph");
        Ok(samples)
    }

    /// Turns the whole graph into one sample by appending the root node.
    fn into_whole_sample(self) -> GraphSample {
        let Self {
            mut kinds,
            var_count,
            mut edges,
            mut attrs,
            labels,
            node_to_var,
            ..
        } = self;

        let root = kinds.len();
        for clause_node in var_count..root {
            debug_assert_eq!(kinds[clause_node], NodeKind::Clause);
            edges.push((root, clause_node));
            attrs.push(ATTR_ROOT);
        }
        kinds.push(NodeKind::Root);

        GraphSample {
            kinds,
            var_count,
            edges,
            attrs,
            labels,
            node_to_var,
        }
    }

    /// Relabels one component into a sample, or `None` when it is dropped.
    fn component_sample(
        &self,
        component: &Component,
    ) -> Result<Option<GraphSample>, ConvertError> {
        let members = &component.members;
        if members.len() < MIN_COMPONENT_MEMBERS {
            return Ok(None);
        }

        // Members are ascending, so variable nodes come first after the
        // relabel and keep their relative order.
        let mut new_id: HashMap<usize, usize> = HashMap::with_capacity(members.len());
        for (index, &node) in members.iter().enumerate() {
            new_id.insert(node, index);
        }
        let sub_var_count = members
            .iter()
            .filter(|&&node| self.kinds[node] == NodeKind::Variable)
            .count();
        debug_assert!(
            members[..sub_var_count]
                .iter()
                .all(|&node| node < self.var_count)
        );

        let sub_labels: Vec<i8> = members[..sub_var_count]
            .iter()
            .map(|&node| self.labels[node])
            .collect();
        if !sub_labels
            .iter()
            .any(|&label| label == LABEL_FORCED_TRUE || label == LABEL_FORCED_FALSE)
        {
            return Ok(None);
        }

        let sub_node_to_var: Vec<u32> = members[..sub_var_count]
            .iter()
            .map(|&node| self.node_to_var[node])
            .collect();

        let mut sub_edges = Vec::with_capacity(component.edges.len() + members.len());
        let mut sub_attrs = Vec::with_capacity(component.edges.len() + members.len());
        for &(u, v, attr) in &component.edges {
            let (Some(&a), Some(&b)) = (new_id.get(&u), new_id.get(&v)) else {
                return Err(ConvertError::Inconsistency {
                    detail: "edge endpoint missing from relabel map",
                    node_a: u,
                    node_b: v,
                });
            };
            sub_edges.push((a, b));
            sub_attrs.push(attr);
        }

        let mut sub_kinds: Vec<NodeKind> =
            members.iter().map(|&node| self.kinds[node]).collect();
        let root = sub_kinds.len();
        for clause_node in sub_var_count..root {
            sub_edges.push((root, clause_node));
            sub_attrs.push(ATTR_ROOT);
        }
        sub_kinds.push(NodeKind::Root);

        Ok(Some(GraphSample {
            kinds: sub_kinds,
            var_count: sub_var_count,
            edges: sub_edges,
            attrs: sub_attrs,
            labels: sub_labels,
            node_to_var: sub_node_to_var,
        }))
    }
}
