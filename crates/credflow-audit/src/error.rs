//! Error types for the audit crate.

use credflow_core::JsonFileError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing audit files.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A required input file does not exist.
    #[error("critical data source not found: {}", .0.display())]
    MissingSource(PathBuf),

    /// The file exists but could not be read, parsed or written.
    #[error(transparent)]
    File(JsonFileError),
}

impl From<JsonFileError> for AuditError {
    fn from(err: JsonFileError) -> Self {
        match err {
            JsonFileError::NotFound(path) => Self::MissingSource(path),
            other => Self::File(other),
        }
    }
}
