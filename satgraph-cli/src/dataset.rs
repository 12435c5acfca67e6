//! Parallel dataset orchestration.
//!
//! Walks a directory of CNF files, pairs each with its backbone file,
//! dispatches every pair to a fixed-size pool of worker processes, and
//! streams a manifest with one row per source file. A failing item never
//! aborts the batch; it is recorded as a zero-sample row.

use std::fs::{self, File};
use std::io::{self, BufWriter, LineWriter, Read, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use flate2::read::GzDecoder;
use tracing::{error, info, warn};

use satgraph_core::{ConverterBuilder, SampleRecord, sample_file_name};

use crate::cli::CliError;

/// One batch of work: where to read, where to write, how hard to push.
#[derive(Clone, Debug)]
pub struct BatchJob {
    /// Directory containing the source CNF files.
    pub source: PathBuf,
    /// Directory receiving the serialized samples.
    pub target: PathBuf,
    /// Manifest file receiving one row per source file.
    pub manifest: PathBuf,
    /// Number of concurrently running worker processes.
    pub workers: NonZeroUsize,
    /// Per-file wall-clock budget.
    pub timeout: Duration,
}

/// Result of one dispatched item.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ItemOutcome {
    /// Source file name, as written to the manifest.
    pub name: String,
    /// Number of samples produced (zero on any failure).
    pub samples: usize,
}

/// Aggregate outcome of a batch run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExecutionSummary {
    /// Source files processed.
    pub processed: usize,
    /// Samples written across all files.
    pub samples: usize,
    /// Files that produced zero samples.
    pub failures: usize,
}

/// Seam between the dispatcher pool and the per-item worker.
///
/// Production spawns an isolated OS process per item so a crashing or
/// memory-exhausting parse cannot take down the batch; tests can run items
/// in-process instead.
pub trait WorkerLauncher: Sync {
    /// Converts one CNF file, writing samples under `target`. Returns the
    /// number of samples produced; every failure surfaces as zero.
    fn launch(&self, cnf: &Path, target: &Path, timeout: Duration) -> usize;
}

/// Launches the binary's own hidden `convert-one` subcommand per item.
#[derive(Debug)]
pub struct SubprocessLauncher {
    exe: PathBuf,
}

impl SubprocessLauncher {
    /// Resolves the currently running executable as the worker binary.
    ///
    /// # Errors
    /// Returns [`CliError::Io`] when the executable path cannot be resolved.
    pub fn from_current_exe() -> Result<Self, CliError> {
        let exe = std::env::current_exe().map_err(|source| CliError::Io {
            path: PathBuf::from("<current-exe>"),
            source,
        })?;
        Ok(Self { exe })
    }
}

impl WorkerLauncher for SubprocessLauncher {
    fn launch(&self, cnf: &Path, target: &Path, timeout: Duration) -> usize {
        let output = Command::new(&self.exe)
            .arg("convert-one")
            .arg("--cnf")
            .arg(cnf)
            .arg("--target")
            .arg(target)
            .arg("--timeout-secs")
            .arg(timeout.as_secs().to_string())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(err) => {
                warn!(path = %cnf.display(), error = %err, "failed to spawn worker process");
                return 0;
            }
        };
        if !output.status.success() {
            warn!(
                path = %cnf.display(),
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "worker process failed"
            );
            return 0;
        }
        match String::from_utf8_lossy(&output.stdout).trim().parse() {
            Ok(samples) => samples,
            Err(_) => {
                warn!(path = %cnf.display(), "worker produced unparseable output");
                0
            }
        }
    }
}

/// Runs one batch: discovers source files, drives the worker pool, and
/// streams the manifest, flushing after every row so a crash loses at most
/// the in-flight item.
///
/// Results are consumed in completion order, not submission order; samples
/// are independent so no cross-item ordering is required.
///
/// # Errors
/// Returns [`CliError::Io`] for failures touching the source directory,
/// target directory, or manifest file. Per-item conversion failures are not
/// errors here; they become zero-sample manifest rows.
pub fn run_batch(job: &BatchJob, launcher: &dyn WorkerLauncher) -> Result<ExecutionSummary, CliError> {
    fs::create_dir_all(&job.target).map_err(|err| io_error(&job.target, err))?;

    let mut items = list_source_files(&job.source)?;
    items.sort();
    info!(
        files = items.len(),
        workers = job.workers.get(),
        source = %job.source.display(),
        "starting batch"
    );

    let manifest_file =
        File::create(&job.manifest).map_err(|err| io_error(&job.manifest, err))?;
    let mut manifest = LineWriter::new(manifest_file);
    writeln!(manifest, "name,n_data_list").map_err(|err| io_error(&job.manifest, err))?;

    let cursor = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<ItemOutcome>();
    let mut summary = ExecutionSummary::default();

    thread::scope(|scope| -> Result<(), CliError> {
        for _ in 0..job.workers.get() {
            let tx = tx.clone();
            let cursor = &cursor;
            let items = &items;
            scope.spawn(move || {
                loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(path) = items.get(index) else { break };
                    let samples = launcher.launch(path, &job.target, job.timeout);
                    let name = path
                        .file_name()
                        .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
                    if tx.send(ItemOutcome { name, samples }).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        for outcome in rx {
            summary.processed += 1;
            summary.samples += outcome.samples;
            if outcome.samples == 0 {
                summary.failures += 1;
            }
            writeln!(manifest, "{},{}", outcome.name, outcome.samples)
                .map_err(|err| io_error(&job.manifest, err))?;
        }
        Ok(())
    })?;

    info!(
        files = summary.processed,
        samples = summary.samples,
        failures = summary.failures,
        "batch finished"
    );
    Ok(summary)
}

/// Converts a single CNF file: locates the backbone, runs the pipeline, and
/// persists one JSON record per sample.
///
/// Per-file failures (missing backbone, unreadable input, parse errors,
/// empty or irrelevant backbone, timeout, internal inconsistency) are
/// logged and reported as zero samples so the surrounding batch continues.
/// Records are built before any file is created, so a failing item leaves
/// no partial output behind.
///
/// # Errors
/// Returns [`CliError`] only for output-side failures (creating the target
/// directory or writing a sample file); those indicate a broken environment
/// rather than a bad input.
pub fn convert_one(cnf: &Path, target: &Path, timeout: Duration) -> Result<usize, CliError> {
    let Some(backbone_path) = locate_backbone(cnf) else {
        warn!(path = %cnf.display(), "no backbone file found");
        return Ok(0);
    };

    let cnf_text = match read_text(cnf) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %cnf.display(), error = %err, "failed to read formula");
            return Ok(0);
        }
    };
    let backbone_text = match read_text(&backbone_path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %backbone_path.display(), error = %err, "failed to read backbone");
            return Ok(0);
        }
    };

    let converter = ConverterBuilder::new().with_timeout(timeout).build();
    let samples = match converter.convert(&cnf_text, &backbone_text) {
        Ok(samples) => samples,
        Err(err) if err.is_structural() => {
            error!(
                path = %cnf.display(),
                error = %err,
                code = err.code(),
                "internal consistency failure"
            );
            return Ok(0);
        }
        Err(err) => {
            warn!(path = %cnf.display(), error = %err, code = err.code(), "conversion failed");
            return Ok(0);
        }
    };

    let mut records = Vec::with_capacity(samples.len());
    for sample in &samples {
        match sample.to_record() {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(path = %cnf.display(), error = %err, code = err.code(), "sample not serializable");
                return Ok(0);
            }
        }
    }

    fs::create_dir_all(target).map_err(|err| io_error(target, err))?;
    let stem = source_stem(cnf);
    for (index, record) in records.iter().enumerate() {
        write_record(&target.join(sample_file_name(&stem, index)), record)?;
    }
    info!(path = %cnf.display(), samples = records.len(), "file converted");
    Ok(records.len())
}

/// Locates the backbone for `cnf` by directory substring substitution
/// (`cnf` → `backbone`) and `<stem>.backbone[.gz]` naming.
#[must_use]
pub fn locate_backbone(cnf: &Path) -> Option<PathBuf> {
    let parent = cnf.parent()?.to_string_lossy().replace("cnf", "backbone");
    let stem = cnf.file_stem()?.to_string_lossy();
    for name in [format!("{stem}.backbone"), format!("{stem}.backbone.gz")] {
        let candidate = Path::new(&parent).join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Reads a text file, transparently gunzipping `.gz` inputs.
fn read_text(path: &Path) -> Result<String, CliError> {
    let file = File::open(path).map_err(|err| io_error(path, err))?;
    let gzipped = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    let mut reader: Box<dyn Read> = if gzipped {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|err| io_error(path, err))?;
    Ok(text)
}

/// File name with its final extension removed; used for output naming and
/// backbone lookup so `foo.cnf.gz` and `foo.cnf` resolve consistently.
fn source_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "sample".to_owned(), |stem| stem.to_string_lossy().into_owned())
}

fn write_record(path: &Path, record: &SampleRecord) -> Result<(), CliError> {
    let file = File::create(path).map_err(|err| io_error(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, record).map_err(|source| CliError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|err| io_error(path, err))?;
    Ok(())
}

fn io_error(path: &Path, source: io::Error) -> CliError {
    CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let entries = fs::read_dir(dir).map_err(|err| io_error(dir, err))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| io_error(dir, err))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}
