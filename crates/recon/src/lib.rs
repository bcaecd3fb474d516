//! `tally-recon` — ledger self-reconciliation engine.
//!
//! Pure engine crate: receives entries, returns classified balances and the
//! report tables built from them. No filesystem or CLI dependencies.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod hist;
pub mod identifier;
pub mod matcher;
pub mod model;
pub mod report;

pub use config::ReconConfig;
pub use engine::{load_csv_entries, run, run_csv};
pub use error::ReconError;
pub use model::{Balance, Disposition, Entry, ReconResult, ResolvedEntry, SimilarPair};
pub use report::{assemble_report, Report, TableKind};
