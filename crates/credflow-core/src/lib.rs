//! Shared types for the credflow credit-assessment pipeline.
//!
//! Every stage of the pipeline reads and writes JSON files whose shapes are
//! defined here:
//!
//! - **Inputs**: risk assessments, the customer master and the policy rules file
//! - **Decisions**: one [`DecisionRecord`] per customer processed by the limit stage
//! - **Unified log**: per-customer [`Workflow`]s holding log entries from every agent
//!
//! Pipeline configuration (file locations, agent ids, summary strategy and
//! logging) lives in [`config`].

pub mod config;
pub mod decision;
pub mod input;
pub mod json;
mod lenient;
pub mod workflow;

pub use config::{
    AgentsConfig, ConfigError, LoggingConfig, MergeConfig, PathsConfig, PipelineConfig,
    RemoteSummaryConfig, SummaryConfig, SummaryMode,
};
pub use decision::{DecisionRecord, ValidationStatus};
pub use input::{CustomerRecord, PolicyRule, PolicyRulesFile, RiskAssessment};
pub use json::{INDENT_2, INDENT_4, JsonFileError};
pub use workflow::{UnifiedLog, Workflow, WorkflowLogEntry};
