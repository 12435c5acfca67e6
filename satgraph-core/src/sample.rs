//! Post-split graph samples and their serialized record form.
//!
//! A [`GraphSample`] is one independent bipartite graph produced by the
//! splitter: contiguous node ids, variables first, one synthetic root last.
//! Samples are created once, serialized as a [`SampleRecord`], and never
//! mutated. The record form expands the directed edges into undirected
//! pairs so downstream consumers can use it as-is.

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::graph::NodeKind;

/// One independent bipartite graph produced by the splitter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphSample {
    pub(crate) kinds: Vec<NodeKind>,
    pub(crate) var_count: usize,
    pub(crate) edges: Vec<(usize, usize)>,
    pub(crate) attrs: Vec<i8>,
    pub(crate) labels: Vec<i8>,
    pub(crate) node_to_var: Vec<u32>,
}

impl GraphSample {
    /// Number of nodes, including the synthetic root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.kinds.len()
    }

    /// Number of variable nodes.
    #[must_use]
    pub const fn var_count(&self) -> usize {
        self.var_count
    }

    /// Per-node kind tags: variables, then clauses, then the root.
    #[must_use]
    pub fn kinds(&self) -> &[NodeKind] {
        &self.kinds
    }

    /// Directed edges (literal occurrences plus root edges).
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Edge attributes, parallel to [`Self::edges`].
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

    /// Produces the serialized record: node features, the directed edges
    /// followed by their swapped duplicates, doubled attributes, labels, and
    /// the reverse variable map.
    ///
    /// # Errors
    /// Returns [`ConvertError::SampleTooLarge`] if a node id does not fit
    /// the record's id width.
    pub fn to_record(&self) -> Result<SampleRecord, ConvertError> {
        let nodes = self.kinds.len();
        let narrow = |id: usize| {
            u32::try_from(id).map_err(|_| ConvertError::SampleTooLarge { nodes })
        };

        let x: Vec<i8> = self.kinds.iter().map(|kind| kind.feature()).collect();

        let mut edge_index = Vec::with_capacity(self.edges.len() * 2);
        for &(u, v) in &self.edges {
            edge_index.push([narrow(u)?, narrow(v)?]);
        }
        for &(u, v) in &self.edges {
            edge_index.push([narrow(v)?, narrow(u)?]);
        }

        let mut edge_attr = Vec::with_capacity(self.attrs.len() * 2);
        edge_attr.extend_from_slice(&self.attrs);
        edge_attr.extend_from_slice(&self.attrs);

        Ok(SampleRecord {
            x,
            edge_index,
            edge_attr,
            y: Some(self.labels.clone()),
            n2v: self.node_to_var.clone(),
        })
    }
}

/// Serialized graph sample, one JSON object per output file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SampleRecord {
    /// Node features: `1` variable, `-1` clause, `0` root.
    pub x: Vec<i8>,
    /// Directed edges followed by their swapped duplicates.
    pub edge_index: Vec<[u32; 2]>,
    /// Edge attributes (`1` positive, `-1` negative, `0` root), doubled in
    /// step with `edge_index`.
    pub edge_attr: Vec<i8>,
    /// Per-variable labels: `0` forced true, `1` forced false, `2` unknown.
    /// Absent when the producing pipeline carried no labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<i8>>,
    /// Reverse map from variable-node id to original variable number.
    pub n2v: Vec<u32>,
}

/// Output file name for sample `index` of source `stem`.
///
/// # Examples
/// ```
/// use satgraph_core::sample_file_name;
///
/// assert_eq!(sample_file_name("uf20-01.cnf", 2), "uf20-01.cnf.c-2.json");
/// ```
#[must_use]
pub fn sample_file_name(stem: &str, index: usize) -> String {
    format!("{stem}.c-{index}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_sample() -> GraphSample {
        GraphSample {
            kinds: vec![NodeKind::Variable, NodeKind::Clause, NodeKind::Root],
            var_count: 1,
            edges: vec![(0, 1), (2, 1)],
            attrs: vec![1, 0],
            labels: vec![0],
            node_to_var: vec![7],
        }
    }

    #[test]
    fn record_doubles_edges_with_swapped_endpoints() {
        let record = tiny_sample().to_record().expect("record must convert");
        assert_eq!(record.x, vec![1, -1, 0]);
        assert_eq!(
            record.edge_index,
            vec![[0, 1], [2, 1], [1, 0], [1, 2]]
        );
        assert_eq!(record.edge_attr, vec![1, 0, 1, 0]);
        assert_eq!(record.y, Some(vec![0]));
        assert_eq!(record.n2v, vec![7]);
    }

    #[test]
    fn record_keeps_edge_and_attribute_lists_in_step() {
        let record = tiny_sample().to_record().expect("record must convert");
        assert_eq!(record.edge_index.len(), record.edge_attr.len());
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = tiny_sample().to_record().expect("record must convert");
        let encoded = serde_json::to_string(&record).expect("record must encode");
        let decoded: SampleRecord =
            serde_json::from_str(&encoded).expect("record must decode");
        assert_eq!(decoded, record);
    }

    #[test]
    fn missing_labels_deserialize_as_none() {
        let decoded: SampleRecord = serde_json::from_str(
            r#"{"x":[1,-1,0],"edge_index":[[0,1]],"edge_attr":[1],"n2v":[3]}"#,
        )
        .expect("record must decode");
        assert_eq!(decoded.y, None);
    }

    #[test]
    fn file_names_carry_stem_and_index() {
        assert_eq!(sample_file_name("a", 0), "a.c-0.json");
        assert_eq!(sample_file_name("b.cnf", 11), "b.cnf.c-11.json");
    }
}
