// Batch input: read a delimited file and hand it to the engine loader

use std::io::Read;
use std::path::Path;

use tally_recon::model::Entry;
use tally_recon::ReconConfig;

use crate::error::IoError;

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |e: std::io::Error| IoError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (accounting exports on Windows)
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Load one input batch from disk.
pub fn load_batch(path: &Path, config: &ReconConfig) -> Result<Vec<Entry>, IoError> {
    let content = read_file_as_utf8(path)?;
    Ok(tally_recon::load_csv_entries(&content, config)?)
}
