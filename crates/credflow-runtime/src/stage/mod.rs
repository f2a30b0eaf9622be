//! Pipeline stages.
//!
//! Each stage runs perceive → decide → act against files on disk and reports
//! what it did. A stage that cannot start (missing or unreadable input)
//! returns a [`StageError`]; the [`Pipeline`](crate::Pipeline) logs it and
//! moves on to the next stage.

mod audit;
mod limits;
mod merge;

pub use audit::AuditLoggerStage;
pub use limits::LimitSetterStage;
pub use merge::MergerStage;

use credflow_audit::AuditError;
use credflow_core::JsonFileError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a stage terminated early.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("critical data source not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error(transparent)]
    File(JsonFileError),
}

impl From<JsonFileError> for StageError {
    fn from(err: JsonFileError) -> Self {
        match err {
            JsonFileError::NotFound(path) => Self::MissingSource(path),
            other => Self::File(other),
        }
    }
}

impl From<AuditError> for StageError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::MissingSource(path) => Self::MissingSource(path),
            AuditError::File(inner) => Self::File(inner),
        }
    }
}

/// Counts from one completed stage run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: &'static str,
    /// Records produced or appended.
    pub processed: usize,
    /// Inputs passed over (unknown customers, unmatched entries, missing sources).
    pub skipped: usize,
    /// Records carrying a `FAIL` status.
    pub failed: usize,
    /// File written, if any.
    pub output: Option<PathBuf>,
}

impl StageReport {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            processed: 0,
            skipped: 0,
            failed: 0,
            output: None,
        }
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: processed={} skipped={} failed={}",
            self.stage, self.processed, self.skipped, self.failed
        )?;
        match &self.output {
            Some(path) => write!(f, " output={}", path.display()),
            None => f.write_str(" output=-"),
        }
    }
}

/// One step of the pipeline.
pub trait Stage: Send + Sync {
    /// Stable stage name (`limits`, `merge`, `audit`).
    fn name(&self) -> &'static str;

    /// Id of the agent this stage runs as.
    fn agent_id(&self) -> &str;

    fn run(&self) -> Result<StageReport, StageError>;
}
