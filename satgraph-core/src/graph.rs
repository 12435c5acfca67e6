//! Unified bipartite graph construction.
//!
//! The builder runs two lazy passes over the clause stream. The first pass
//! assigns variable-node ids in first-encounter order and allocates label
//! slots; the second allocates one clause node per clause and emits one
//! polarity-tagged edge per literal occurrence, feeding every edge into the
//! union-find forest.

use std::collections::HashMap;

use crate::backbone::Backbone;
use crate::deadline::{Deadline, Phase};
use crate::dimacs::Clauses;
use crate::error::ConvertError;
use crate::forest::Forest;

/// Label for a variable forced to true.
pub const LABEL_FORCED_TRUE: i8 = 0;
/// Label for a variable forced to false.
pub const LABEL_FORCED_FALSE: i8 = 1;
/// Label for a variable the backbone does not mention.
pub const LABEL_UNKNOWN: i8 = 2;

/// Polarity attribute of a positive-literal edge.
pub const ATTR_POSITIVE: i8 = 1;
/// Polarity attribute of a negative-literal edge.
pub const ATTR_NEGATIVE: i8 = -1;
/// Attribute of a synthetic root edge.
pub const ATTR_ROOT: i8 = 0;

/// Kind tag carried by every node.
///
/// Variable nodes occupy the id range below the variable count and clause
/// nodes the range above it; that positional layout is kept as an internal
/// optimization, but the explicit tag is authoritative during relabeling.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    /// A propositional variable.
    Variable,
    /// A clause of the formula.
    Clause,
    /// The synthetic root injected per sample.
    Root,
}

impl NodeKind {
    /// Scalar feature value used in the serialized form.
    #[must_use]
    pub const fn feature(self) -> i8 {
        match self {
            Self::Variable => 1,
            Self::Clause => -1,
            Self::Root => 0,
        }
    }
}

/// Bipartite graph over one whole formula, before component splitting.
#[derive(Debug)]
pub struct UnifiedGraph {
    pub(crate) kinds: Vec<NodeKind>,
    pub(crate) var_count: usize,
    pub(crate) edges: Vec<(usize, usize)>,
    pub(crate) attrs: Vec<i8>,
    pub(crate) labels: Vec<i8>,
    pub(crate) node_to_var: Vec<u32>,
    pub(crate) forest: Forest,
}

impl UnifiedGraph {
    /// Builds the unified graph from the formula text and backbone.
    ///
    /// A backbone literal for a variable absent from the formula is silently
    /// irrelevant; if no present variable ends up labeled, the whole build is
    /// rejected because the resulting samples would carry no signal.
    ///
    /// # Errors
    /// Returns [`ConvertError::Parse`] for malformed clause lines,
    /// [`ConvertError::IrrelevantBackbone`] when no label lands on a present
    /// variable, and [`ConvertError::Timeout`] when `deadline` expires at a
    /// clause boundary.
    pub fn build(cnf: &str, backbone: &Backbone, deadline: &Deadline) -> Result<Self, ConvertError> {
        let mut var_to_node: HashMap<u32, usize> = HashMap::new();
        let mut node_to_var: Vec<u32> = Vec::new();
        let mut clause_count = 0usize;

        for clause in Clauses::new(cnf) {
            deadline.check(Phase::Variables)?;
            let clause = clause?;
            clause_count += 1;
            for lit in clause {
                let variable = lit.unsigned_abs();
                if !var_to_node.contains_key(&variable) {
                    var_to_node.insert(variable, node_to_var.len());
                    node_to_var.push(variable);
                }
            }
        }
        let var_count = node_to_var.len();

        let mut labels = vec![LABEL_UNKNOWN; var_count];
        let mut labeled = false;
        for (node, &variable) in node_to_var.iter().enumerate() {
            if let Some(positive) = backbone.polarity(variable) {
                labels[node] = if positive {
                    LABEL_FORCED_TRUE
                } else {
                    LABEL_FORCED_FALSE
                };
                labeled = true;
            }
        }
        if !labeled {
            return Err(ConvertError::IrrelevantBackbone);
        }

        let node_count = var_count + clause_count;
        let mut kinds = vec![NodeKind::Variable; var_count];
        kinds.reserve(clause_count);
        let mut forest = Forest::new(node_count);
        let mut edges: Vec<(usize, usize)> = Vec::new();
        let mut attrs: Vec<i8> = Vec::new();
        let mut clause_node = var_count;

        for clause in Clauses::new(cnf) {
            deadline.check(Phase::Edges)?;
            let clause = clause?;
            kinds.push(NodeKind::Clause);
            for lit in clause {
                let variable = lit.unsigned_abs();
                let Some(&var_node) = var_to_node.get(&variable) else {
                    return Err(ConvertError::Inconsistency {
                        detail: "literal variable missing from first pass",
                        node_a: variable as usize,
                        node_b: clause_node,
                    });
                };
                let attr = if lit > 0 { ATTR_POSITIVE } else { ATTR_NEGATIVE };
                edges.push((var_node, clause_node));
                attrs.push(attr);
                forest.union(var_node, clause_node, attr);
            }
            clause_node += 1;
        }

        debug_assert_eq!(kinds.len(), node_count);
        debug_assert_eq!(edges.len(), attrs.len());

        Ok(Self {
            kinds,
            var_count,
            edges,
            attrs,
            labels,
            node_to_var,
            forest,
        })
    }

    /// Number of nodes (variables plus clauses).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.kinds.len()
    }

    /// Number of variable nodes.
    #[must_use]
    pub const fn var_count(&self) -> usize {
        self.var_count
    }

    /// Per-node kind tags, variables first.
    #[must_use]
    pub fn kinds(&self) -> &[NodeKind] {
        &self.kinds
    }

    /// Directed edges, one per literal occurrence.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Polarity attributes, parallel to [`Self::edges`].
    #[must_use]
    pub fn attrs(&self) -> &[i8] {
        &self.attrs
    }

    /// Per-variable labels, length [`Self::var_count`].
    #[must_use]
    pub fn labels(&self) -> &[i8] {
        &self.labels
    }

    /// Reverse map from variable-node id to original variable number.
    #[must_use]
    pub fn node_to_var(&self) -> &[u32] {
        &self.node_to_var
    }
}
