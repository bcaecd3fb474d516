// tally CLI - ledger self-reconciliation over CSV batches

mod exit_codes;
mod run;
mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tally_io::artifacts::{self, Artifact};
use tally_io::IoError;
use tally_recon::ReconConfig;

use exit_codes::{io_exit_code, EXIT_ARTIFACT, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Reconcile ledger extracts and export Excel reports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/tally/config.toml when present)
    #[arg(long, short = 'c', global = true, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile one or more CSV batches, one Excel report per batch
    #[command(after_help = "\
Each input is processed independently: a batch that fails does not stop
the others. The exit code is that of the first failed batch.

Examples:
  tally run janeiro.csv
  tally run janeiro.csv fevereiro.csv --out reports/
  tally run extract.csv --dry-run --json | jq .batches[0].result.summary
  tally run extract.csv --config br.toml")]
    Run {
        /// Input CSV files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (overrides [output] dir from config)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Print results as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Reconcile without writing any report
        #[arg(long)]
        dry_run: bool,
    },

    /// Check a config file and print the effective settings
    #[command(after_help = "\
Examples:
  tally validate br.toml
  tally validate")]
    Validate {
        /// Config to check (default: the discovered config)
        path: Option<PathBuf>,
    },

    /// List exported reports
    #[command(after_help = "\
Examples:
  tally list
  tally list --out reports/ --json")]
    List {
        /// Report directory (overrides [output] dir from config)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename an exported report
    #[command(after_help = "\
Examples:
  tally rename janeiro janeiro-2024
  tally rename janeiro.xlsx fechamento.xlsx --out reports/")]
    Rename {
        /// Current report name (.xlsx optional)
        from: String,
        /// New report name (.xlsx optional)
        to: String,
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Delete an exported report
    Delete {
        /// Report name (.xlsx optional)
        name: String,
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Open an exported report with the system spreadsheet application
    Open {
        /// Report name (.xlsx optional)
        name: String,
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  tally-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  tally-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Logs go to stderr; stdout is reserved for --json output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            };
        }
    };

    init_logging(cli.verbose);

    let result = dispatch(cli.command, cli.config.as_deref());

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            eprintln!("error: {}", message);
            if let Some(h) = hint {
                eprintln!("hint:  {}", h);
            }
            ExitCode::from(code)
        }
    }
}

fn dispatch(command: Commands, config_path: Option<&Path>) -> Result<(), CliError> {
    match command {
        Commands::Run { inputs, out, json, dry_run } => {
            let config = settings::load(config_path)?;
            let out_dir = out.unwrap_or_else(|| config.output.dir.clone());
            run::cmd_run(&inputs, &config, out_dir, json, dry_run)
        }
        Commands::Validate { path } => {
            let path = path.as_deref().or(config_path);
            let config = settings::load(path)?;
            cmd_validate(&config, path)
        }
        Commands::List { out, json } => {
            let dir = report_dir(out, config_path)?;
            cmd_list(&dir, json)
        }
        Commands::Rename { from, to, out } => {
            let dir = report_dir(out, config_path)?;
            let path = artifacts::rename_artifact(&dir, &from, &to).map_err(CliError::artifact)?;
            eprintln!("renamed to {}", path.display());
            Ok(())
        }
        Commands::Delete { name, out } => {
            let dir = report_dir(out, config_path)?;
            artifacts::delete_artifact(&dir, &name).map_err(CliError::artifact)?;
            eprintln!("deleted {}", name);
            Ok(())
        }
        Commands::Open { name, out } => {
            let dir = report_dir(out, config_path)?;
            artifacts::open_artifact(&dir, &name).map_err(CliError::artifact)?;
            Ok(())
        }
    }
}

fn report_dir(out: Option<PathBuf>, config_path: Option<&Path>) -> Result<PathBuf, CliError> {
    match out {
        Some(dir) => Ok(dir),
        None => Ok(settings::load(config_path)?.output.dir),
    }
}

fn cmd_validate(config: &ReconConfig, path: Option<&Path>) -> Result<(), CliError> {
    let source = match path {
        Some(p) => p.display().to_string(),
        None if settings::config_path().is_file() => settings::config_path().display().to_string(),
        None => "built-in defaults".to_string(),
    };
    eprintln!("config ok: {}", source);
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot render config: {e}")))?;
    print!("{}", rendered);
    Ok(())
}

fn cmd_list(dir: &Path, json: bool) -> Result<(), CliError> {
    let reports: Vec<Artifact> = artifacts::list_artifacts(dir).map_err(CliError::artifact)?;

    if json {
        let out = serde_json::to_string_pretty(&reports)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization failed: {e}")))?;
        println!("{}", out);
        return Ok(());
    }

    if reports.is_empty() {
        eprintln!("no reports in {}", dir.display());
        return Ok(());
    }
    for report in &reports {
        let modified = report
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<32} {:>10}  {}", report.name, report.size, modified);
    }
    Ok(())
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Map an I/O-layer error to its registered exit code.
    pub fn io(err: IoError) -> Self {
        let hint = match &err {
            IoError::PermissionDenied { .. } => {
                Some("close the report if it is open in a spreadsheet application".to_string())
            }
            e if e.is_schema_error() => {
                Some("check [columns] and [input] in the config against the CSV header".to_string())
            }
            _ => None,
        };
        Self { code: io_exit_code(&err), message: err.to_string(), hint }
    }

    fn artifact(err: IoError) -> Self {
        let mut e = Self::io(err);
        if e.code == EXIT_ERROR {
            e.code = EXIT_ARTIFACT;
        }
        e
    }
}
