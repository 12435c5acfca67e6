//! Batch CLI for converting DIMACS CNF + backbone pairs into labeled
//! bipartite graph samples.

pub mod cli;
pub mod dataset;
pub mod logging;
