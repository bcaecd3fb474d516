// tally run - reconcile CSV batches and export one report per batch

use std::path::{Path, PathBuf};

use serde::Serialize;
use tally_io::export::ExportResult;
use tally_io::{run_batches, BatchOptions, BatchOutcome};
use tally_recon::{ReconConfig, ReconResult};

use crate::exit_codes::EXIT_ERROR;
use crate::CliError;

#[derive(Serialize)]
struct RunOutput<'a> {
    batches: Vec<BatchJson<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum BatchJson<'a> {
    Ok {
        input: &'a Path,
        export: Option<&'a ExportResult>,
        result: &'a ReconResult,
    },
    Error {
        input: &'a Path,
        code: u8,
        error: String,
    },
}

pub fn cmd_run(
    inputs: &[PathBuf],
    config: &ReconConfig,
    out_dir: PathBuf,
    json_output: bool,
    dry_run: bool,
) -> Result<(), CliError> {
    let options = BatchOptions { out_dir, dry_run };
    let outcomes = run_batches(inputs, config, &options);

    if json_output {
        let output = RunOutput { batches: outcomes.iter().map(batch_json).collect() };
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    for outcome in &outcomes {
        match outcome {
            Ok(report) => print_summary(&report.input, &report.result, report.export.as_ref()),
            Err(failed) => eprintln!("{}: failed: {}", failed.input.display(), failed.error),
        }
    }

    let total = outcomes.len();
    let mut failed = outcomes.into_iter().filter_map(Result::err);
    let Some(first) = failed.next() else {
        return Ok(());
    };
    let failures = 1 + failed.count();

    let mut err = CliError::io(first.error);
    err.message = if total == 1 {
        format!("{}: {}", first.input.display(), err.message)
    } else {
        format!(
            "{failures} of {total} batches failed; first: {}: {}",
            first.input.display(),
            err.message
        )
    };
    Err(err)
}

fn batch_json(outcome: &BatchOutcome) -> BatchJson<'_> {
    match outcome {
        Ok(report) => BatchJson::Ok {
            input: &report.input,
            export: report.export.as_ref(),
            result: &report.result,
        },
        Err(failed) => BatchJson::Error {
            input: &failed.input,
            code: crate::exit_codes::io_exit_code(&failed.error),
            error: failed.error.to_string(),
        },
    }
}

fn print_summary(input: &Path, result: &ReconResult, export: Option<&ExportResult>) {
    let s = &result.summary;
    eprintln!(
        "{}: {} entries, {} balances: {} settled, {} advance, {} outstanding, {} deferred; {} unrecognized, {} similar pairs",
        input.display(),
        s.total_entries,
        s.balances,
        s.settled,
        s.advance,
        s.outstanding,
        s.deferred,
        s.unrecognized_entries,
        s.similar_pairs,
    );
    match export {
        Some(export) => eprintln!(
            "  wrote {} ({} sheets, {} rows)",
            export.path.display(),
            export.sheets_exported,
            export.rows_exported
        ),
        None => eprintln!("  dry run, nothing written"),
    }
}
