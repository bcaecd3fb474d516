// Exported report management: list, rename, delete, open
//
// Operates on file names inside the export directory only; never reads
// report contents.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::IoError;

const EXTENSION: &str = "xlsx";

#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    /// File name without the `.xlsx` extension.
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

fn has_xlsx_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(EXTENSION))
        .unwrap_or(false)
}

/// Normalize a user-supplied report name to a bare `*.xlsx` file name.
pub fn artifact_file_name(name: &str) -> Result<String, IoError> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\']);
    if invalid {
        return Err(IoError::InvalidName { name: name.into() });
    }

    if has_xlsx_extension(Path::new(trimmed)) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}.{EXTENSION}"))
    }
}

fn existing_artifact(dir: &Path, name: &str) -> Result<PathBuf, IoError> {
    let path = dir.join(artifact_file_name(name)?);
    if path.is_file() {
        Ok(path)
    } else {
        Err(IoError::ArtifactNotFound { name: name.into() })
    }
}

/// List exported reports, sorted by name. A missing directory lists as empty.
pub fn list_artifacts(dir: &Path) -> Result<Vec<Artifact>, IoError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let read_err = |e: std::io::Error| IoError::Read {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };

    let mut artifacts = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if !path.is_file() || !has_xlsx_extension(&path) {
            continue;
        }
        let metadata = entry.metadata().map_err(read_err)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        artifacts.push(Artifact {
            name,
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            path,
        });
    }

    artifacts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(artifacts)
}

/// Rename a report inside `dir`. The new name always ends in `.xlsx`;
/// an existing report is never replaced.
pub fn rename_artifact(dir: &Path, from: &str, to: &str) -> Result<PathBuf, IoError> {
    let source = existing_artifact(dir, from)?;
    let target = dir.join(artifact_file_name(to)?);
    if target.exists() {
        return Err(IoError::ArtifactExists { name: to.into() });
    }
    std::fs::rename(&source, &target).map_err(|e| IoError::from_write(source.clone(), e))?;
    log::info!("renamed {} to {}", source.display(), target.display());
    Ok(target)
}

pub fn delete_artifact(dir: &Path, name: &str) -> Result<(), IoError> {
    let path = existing_artifact(dir, name)?;
    std::fs::remove_file(&path).map_err(|e| IoError::from_write(path.clone(), e))?;
    log::info!("deleted {}", path.display());
    Ok(())
}

/// Hand the report to the system's default viewer.
pub fn open_artifact(dir: &Path, name: &str) -> Result<PathBuf, IoError> {
    let path = existing_artifact(dir, name)?;
    open::that(&path).map_err(|e| IoError::Open {
        path: path.clone(),
        message: e.to_string(),
    })?;
    Ok(path)
}
