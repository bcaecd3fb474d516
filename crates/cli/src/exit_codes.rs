//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | CLI usage error (bad args)                               |
//! | 3    | Invalid config (parse or validation)                     |
//! | 4    | Schema error in at least one batch                       |
//! | 5    | Export destination locked / permission denied            |
//! | 6    | Report management failed (missing, exists, bad name)    |
//! | 7    | Input batch unreadable                                   |
//!
//! For multi-batch runs the code of the first failed batch wins.

use tally_io::IoError;
use tally_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file could not be read, parsed or validated.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input missing a required column, or a row with an unparsable
/// amount / type code or an empty reference.
pub const EXIT_SCHEMA: u8 = 4;

/// Export destination refused access. Nothing was overwritten.
pub const EXIT_PERMISSION: u8 = 5;

/// list / rename / delete / open failed.
pub const EXIT_ARTIFACT: u8 = 6;

/// Input file could not be read.
pub const EXIT_INPUT: u8 = 7;

pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        e if e.is_schema_error() => EXIT_SCHEMA,
        _ => EXIT_ERROR,
    }
}

pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Recon(e) => recon_exit_code(e),
        IoError::PermissionDenied { .. } => EXIT_PERMISSION,
        IoError::Read { .. } => EXIT_INPUT,
        IoError::ArtifactNotFound { .. }
        | IoError::ArtifactExists { .. }
        | IoError::InvalidName { .. }
        | IoError::Open { .. } => EXIT_ARTIFACT,
        IoError::CreateDir { .. } | IoError::Write { .. } | IoError::Xlsx(_) => EXIT_ERROR,
    }
}
