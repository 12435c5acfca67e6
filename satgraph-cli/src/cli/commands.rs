//! Command implementations and argument parsing for the satgraph CLI.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{Span, field, instrument};

use crate::dataset::{self, BatchJob, ExecutionSummary, SubprocessLauncher};

const DEFAULT_TIMEOUT_SECS: u64 = 1000;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "satgraph",
    about = "Convert DIMACS CNF + backbone pairs into labeled graph samples."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Convert every CNF/backbone pair under a directory.
    Convert(ConvertArgs),
    /// Convert a single CNF/backbone pair (spawned internally per item).
    #[command(hide = true)]
    ConvertOne(ConvertOneArgs),
}

/// Options accepted by the `convert` command.
#[derive(Debug, Args, Clone)]
pub struct ConvertArgs {
    /// Directory containing the source CNF files.
    #[arg(long)]
    pub source: PathBuf,

    /// Directory receiving the serialized samples.
    #[arg(long)]
    pub target: PathBuf,

    /// Manifest file receiving one `name,count` row per source file.
    #[arg(long)]
    pub manifest: PathBuf,

    /// Worker process count (defaults to the available parallelism).
    #[arg(long)]
    pub workers: Option<NonZeroUsize>,

    /// Per-file wall-clock budget in seconds.
    #[arg(long = "timeout-secs", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl ConvertArgs {
    fn into_job(self) -> BatchJob {
        BatchJob {
            source: self.source,
            target: self.target,
            manifest: self.manifest,
            workers: self.workers.unwrap_or_else(default_workers),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Options accepted by the hidden `convert-one` worker command.
#[derive(Debug, Args, Clone)]
pub struct ConvertOneArgs {
    /// Path to one CNF file.
    #[arg(long)]
    pub cnf: PathBuf,

    /// Directory receiving the serialized samples.
    #[arg(long)]
    pub target: PathBuf,

    /// Per-file wall-clock budget in seconds.
    #[arg(long = "timeout-secs", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File or directory access failed.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Writing a serialized sample failed.
    #[error("failed to serialize sample to `{path}`: {source}")]
    Serialize {
        /// Path of the sample file being written.
        path: PathBuf,
        /// Underlying serialization failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of executing a CLI command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommandOutcome {
    /// A whole-directory batch run.
    Batch(ExecutionSummary),
    /// A single worker item; the count doubles as the worker protocol.
    Single {
        /// Samples produced for the one file.
        samples: usize,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the batch environment (source directory,
/// target directory, manifest) cannot be accessed. Per-file conversion
/// failures are absorbed into zero-sample outcomes instead.
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutcome, CliError> {
    match cli.command {
        Command::Convert(args) => {
            Span::current().record("command", field::display("convert"));
            let launcher = SubprocessLauncher::from_current_exe()?;
            dataset::run_batch(&args.into_job(), &launcher).map(CommandOutcome::Batch)
        }
        Command::ConvertOne(args) => {
            Span::current().record("command", field::display("convert-one"));
            let timeout = Duration::from_secs(args.timeout_secs);
            dataset::convert_one(&args.cnf, &args.target, timeout)
                .map(|samples| CommandOutcome::Single { samples })
        }
    }
}

/// Renders `outcome` to `writer`.
///
/// A batch run prints a short human-readable summary; a single worker item
/// prints only the sample count, which the orchestrating process parses.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(outcome: &CommandOutcome, mut writer: impl Write) -> io::Result<()> {
    match outcome {
        CommandOutcome::Single { samples } => writeln!(writer, "{samples}"),
        CommandOutcome::Batch(summary) => {
            writeln!(writer, "files: {}", summary.processed)?;
            writeln!(writer, "samples: {}", summary.samples)?;
            writeln!(writer, "failures: {}", summary.failures)
        }
    }
}

fn default_workers() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
