use std::fmt;
use std::path::PathBuf;

use tally_recon::ReconError;

#[derive(Debug)]
pub enum IoError {
    /// Input batch could not be read.
    Read { path: PathBuf, message: String },
    /// Destination is locked or access was refused. Never retried.
    PermissionDenied { path: PathBuf },
    /// Output directory could not be created.
    CreateDir { path: PathBuf, message: String },
    /// Writing the artifact failed for a reason other than permissions.
    Write { path: PathBuf, message: String },
    /// Workbook could not be rendered.
    Xlsx(String),
    ArtifactNotFound { name: String },
    ArtifactExists { name: String },
    /// Artifact names are bare file names, never paths.
    InvalidName { name: String },
    /// System viewer could not be launched.
    Open { path: PathBuf, message: String },
    /// Engine rejected the batch (schema or config).
    Recon(ReconError),
}

impl IoError {
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Recon(e) if e.is_schema_error())
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Classify a filesystem error against the path it happened on.
    pub(crate) fn from_write(path: PathBuf, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::Write { path, message: err.to_string() }
        }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::PermissionDenied { path } => write!(f, "permission denied: '{}'", path.display()),
            Self::CreateDir { path, message } => {
                write!(f, "cannot create directory {}: {message}", path.display())
            }
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
            Self::Xlsx(msg) => write!(f, "XLSX error: {msg}"),
            Self::ArtifactNotFound { name } => write!(f, "no such report: {name}"),
            Self::ArtifactExists { name } => write!(f, "report already exists: {name}"),
            Self::InvalidName { name } => write!(f, "invalid report name: '{name}'"),
            Self::Open { path, message } => write!(f, "cannot open {}: {message}", path.display()),
            Self::Recon(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Recon(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ReconError> for IoError {
    fn from(e: ReconError) -> Self {
        Self::Recon(e)
    }
}

impl From<rust_xlsxwriter::XlsxError> for IoError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Self::Xlsx(e.to_string())
    }
}
