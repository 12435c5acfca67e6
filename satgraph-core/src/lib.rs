//! Conversion of DIMACS CNF formulas plus backbone annotations into labeled
//! bipartite graph samples for machine-learning consumption.
//!
//! The pipeline parses a formula and its backbone, builds a unified
//! variable/clause bipartite graph with polarity-tagged edges while a
//! union-find forest tracks weak connectivity, splits disconnected
//! subproblems into independent relabeled samples with synthetic root
//! nodes, and serializes each sample as a compact record. Every phase runs
//! under an explicit wall-clock [`Deadline`].

mod backbone;
mod convert;
mod deadline;
mod dimacs;
mod error;
mod forest;
mod graph;
mod sample;
mod split;

pub use crate::{
    backbone::Backbone,
    convert::{Converter, ConverterBuilder, DEFAULT_TIMEOUT},
    deadline::{Deadline, Phase},
    dimacs::{Clauses, Lit},
    error::{ConvertError, ParseError, Result},
    forest::{Component, Forest, LoggedEdge},
    graph::{
        ATTR_NEGATIVE, ATTR_POSITIVE, ATTR_ROOT, LABEL_FORCED_FALSE, LABEL_FORCED_TRUE,
        LABEL_UNKNOWN, NodeKind, UnifiedGraph,
    },
    sample::{GraphSample, SampleRecord, sample_file_name},
};
