//! Stages and orchestration for the credflow pipeline.
//!
//! A run executes three stages in order, each reading and writing JSON files
//! named by [`PipelineConfig`](credflow_core::PipelineConfig):
//!
//! 1. [`LimitSetterStage`]: risk scores + customer master + policy rules → decisions
//! 2. [`MergerStage`]: decisions (and upstream agent logs) → unified log
//! 3. [`AuditLoggerStage`]: unified log → audit trail
//!
//! ```no_run
//! use credflow_core::PipelineConfig;
//! use credflow_runtime::{Pipeline, build_generator};
//!
//! let config = PipelineConfig::load_or_default("credflow.yaml").unwrap();
//! let report = Pipeline::from_config(&config, build_generator(&config.summary)).run();
//! println!("succeeded: {}", report.succeeded());
//! ```

pub mod orchestrator;
pub mod stage;
pub mod summary;

pub use orchestrator::{Pipeline, PipelineReport, StageOutcome};
pub use stage::{AuditLoggerStage, LimitSetterStage, MergerStage, Stage, StageError, StageReport};
pub use summary::{
    AzureOpenAiSummaryGenerator, LocalSummaryGenerator, SummaryError, SummaryGenerator,
    SummaryRequest, build_generator,
};

/// Local time in ISO-8601 with microseconds, shared by every record of a stage run.
pub(crate) fn now_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
