//! Command-line interface orchestration for satgraph.
//!
//! Offers a `convert` command that walks a directory of CNF/backbone pairs
//! and a hidden `convert-one` command used as the per-item worker process.

mod commands;

pub use commands::{
    Cli, CliError, Command, CommandOutcome, ConvertArgs, ConvertOneArgs, render_summary, run_cli,
};
