// Config discovery
// Explicit --config, else ~/.config/tally/config.toml, else built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use tally_recon::ReconConfig;

use crate::exit_codes::EXIT_INVALID_CONFIG;
use crate::CliError;

/// Get the default config file path
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally")
        .join("config.toml")
}

fn read_config(path: &Path) -> Result<ReconConfig, CliError> {
    let contents = fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_INVALID_CONFIG,
        message: format!("cannot read config {}: {e}", path.display()),
        hint: None,
    })?;
    ReconConfig::from_toml(&contents).map_err(|e| CliError {
        code: EXIT_INVALID_CONFIG,
        message: format!("{}: {e}", path.display()),
        hint: None,
    })
}

/// Load the config for this invocation.
pub fn load(explicit: Option<&Path>) -> Result<ReconConfig, CliError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let path = config_path();
    if path.is_file() {
        log::debug!("using config {}", path.display());
        read_config(&path)
    } else {
        log::debug!("no config at {}, using defaults", path.display());
        Ok(ReconConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        fs::write(&path, "name = \"custom\"\n[codes]\ndebit = 21\n").unwrap();
        let config = load(Some(&path)).unwrap();
        assert_eq!(config.name, "custom");
        assert_eq!(config.codes.debit, 21);
    }

    #[test]
    fn explicit_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("none.toml"))).unwrap_err();
        assert_eq!(err.code, EXIT_INVALID_CONFIG);
    }

    #[test]
    fn invalid_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        fs::write(&path, "[codes]\ndebit = 1\ncredit = 1\n").unwrap();
        let err = load(Some(&path)).unwrap_err();
        assert_eq!(err.code, EXIT_INVALID_CONFIG);
        assert!(err.message.contains("must differ"));
    }
}
