//! File storage for the unified log and the audit trail.

use credflow_core::json::{read_json, write_json_pretty};
use credflow_core::{INDENT_2, INDENT_4, UnifiedLog, WorkflowLogEntry};
use std::path::{Path, PathBuf};

use crate::error::AuditError;
use crate::trail::AuditTrailEntry;

/// The unified log file (`{ "workflows": [...] }`), read-modify-write.
#[derive(Debug, Clone)]
pub struct UnifiedLogStore {
    path: PathBuf,
}

impl UnifiedLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the unified log. A missing file is [`AuditError::MissingSource`].
    pub fn load(&self) -> Result<UnifiedLog, AuditError> {
        Ok(read_json(&self.path)?)
    }

    /// Overwrite the unified log (2-space indent).
    pub fn save(&self, log: &UnifiedLog) -> Result<(), AuditError> {
        write_json_pretty(&self.path, log, INDENT_2)?;
        tracing::debug!(
            path = %self.path.display(),
            workflows = log.workflows.len(),
            entries = log.entry_count(),
            "Unified log written"
        );
        Ok(())
    }
}

/// Writes the audit trail file (4-space indent), replacing any previous run.
#[derive(Debug, Clone)]
pub struct AuditTrailWriter {
    path: PathBuf,
}

impl AuditTrailWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, trails: &[AuditTrailEntry]) -> Result<(), AuditError> {
        write_json_pretty(&self.path, &trails, INDENT_4)?;
        Ok(())
    }

    /// Read a previously written trail back.
    pub fn read(&self) -> Result<Vec<AuditTrailEntry>, AuditError> {
        Ok(read_json(&self.path)?)
    }
}

/// Read an upstream agent's log file: a JSON array of log entries.
pub fn load_log_entries(path: &Path) -> Result<Vec<WorkflowLogEntry>, AuditError> {
    Ok(read_json(path)?)
}
