// Multi-batch runs: each input is loaded, reconciled and exported on its own

use std::fmt;
use std::path::{Path, PathBuf};

use tally_recon::{assemble_report, ReconConfig, ReconResult};

use crate::error::IoError;
use crate::export::{export_report, output_path_for, ExportResult};
use crate::input::load_batch;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub out_dir: PathBuf,
    /// Reconcile without writing any artifact.
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct BatchReport {
    pub input: PathBuf,
    pub result: ReconResult,
    /// `None` on dry runs.
    pub export: Option<ExportResult>,
}

/// A failed batch, tagged with the input it came from.
#[derive(Debug)]
pub struct BatchError {
    pub input: PathBuf,
    pub error: IoError,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.input.display(), self.error)
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

pub type BatchOutcome = Result<BatchReport, BatchError>;

/// Reconcile one input file and export its report.
///
/// Everything is computed before the export starts, so an error in any
/// earlier stage leaves the output directory untouched.
pub fn run_batch(input: &Path, config: &ReconConfig, options: &BatchOptions) -> Result<BatchReport, IoError> {
    let entries = load_batch(input, config)?;
    let result = tally_recon::run(config, entries)?;
    let report = assemble_report(&result);

    let export = if options.dry_run {
        None
    } else {
        let path = output_path_for(input, &options.out_dir);
        Some(export_report(&report, &path)?)
    };

    Ok(BatchReport {
        input: input.to_path_buf(),
        result,
        export,
    })
}

/// Run every input in order. A failed batch is reported and the next one
/// still runs; no state is shared between batches.
pub fn run_batches(inputs: &[PathBuf], config: &ReconConfig, options: &BatchOptions) -> Vec<BatchOutcome> {
    inputs
        .iter()
        .map(|input| {
            log::debug!("reconciling {}", input.display());
            run_batch(input, config, options).map_err(|error| {
                log::warn!("batch {} failed: {error}", input.display());
                BatchError {
                    input: input.clone(),
                    error,
                }
            })
        })
        .collect()
}
