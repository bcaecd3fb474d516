// File I/O for reconciliation batches: input decoding, Excel export, report management

pub mod artifacts;
pub mod batch;
pub mod error;
pub mod export;
pub mod input;

pub use batch::{run_batch, run_batches, BatchError, BatchOptions, BatchOutcome, BatchReport};
pub use error::IoError;
