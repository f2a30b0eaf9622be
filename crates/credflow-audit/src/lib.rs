//! # credflow-audit
//!
//! Audit trail production for the credflow pipeline.
//!
//! This crate provides functionality for:
//! - Appending agent log entries into the unified log, keyed by customer
//! - Reducing each workflow's logs to an ordered list of pipeline steps and a
//!   single PASS/FAIL status
//! - Reading and writing the unified log and audit trail files
//!
//! ## Pipeline steps
//!
//! | Agent id | Step |
//! |----------|------|
//! | `ExposureAggregator01` | Exposure Aggregation |
//! | `RiskScoring01` | Risk Scoring |
//! | `LimitSetter01` | Limit Setting |
//! | `ComplianceChecker01` | Compliance Check |
//!
//! Events are always emitted in the order of the table above, whatever order
//! the agents logged in.
//!
//! ## Example Usage
//!
//! ```rust
//! use credflow_audit::{AuditSummarizer, LogConsolidator};
//! use credflow_core::{UnifiedLog, ValidationStatus, Workflow, WorkflowLogEntry};
//!
//! let mut log = UnifiedLog::new(vec![Workflow::new("WF-1", "C1")]);
//! let entry = WorkflowLogEntry::new("RiskScoring01", "C1", "t2", ValidationStatus::Pass);
//! LogConsolidator::append(&mut log.workflows, entry);
//!
//! let trail = AuditSummarizer::summarize(&log.workflows[0]);
//! assert_eq!(trail.events.len(), 1);
//! assert_eq!(trail.final_status, ValidationStatus::Pass);
//! ```

pub mod consolidator;
pub mod error;
pub mod storage;
pub mod summarizer;
pub mod trail;

pub use consolidator::{AppendOutcome, LogConsolidator, MergeSummary};
pub use error::AuditError;
pub use storage::{AuditTrailWriter, UnifiedLogStore, load_log_entries};
pub use summarizer::AuditSummarizer;
pub use trail::{AuditEvent, AuditTrailEntry, PipelineStep, StepStatus};
