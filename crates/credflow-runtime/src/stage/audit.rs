use credflow_audit::{AuditSummarizer, AuditTrailEntry, AuditTrailWriter, UnifiedLogStore};
use credflow_core::PipelineConfig;

use super::{Stage, StageError, StageReport};

/// Summarizes every workflow of the unified log into the audit trail.
pub struct AuditLoggerStage {
    agent_id: String,
    store: UnifiedLogStore,
    writer: AuditTrailWriter,
}

impl AuditLoggerStage {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            agent_id: config.agents.audit_logger.clone(),
            store: UnifiedLogStore::new(config.resolve(&config.paths.unified_log)),
            writer: AuditTrailWriter::new(config.resolve(&config.paths.audit_trail)),
        }
    }

    /// Build the trail without writing it.
    pub fn build_trail(&self) -> Result<Vec<AuditTrailEntry>, StageError> {
        let log = self.store.load()?;
        tracing::info!(workflows = log.workflows.len(), "Loaded unified log");
        Ok(AuditSummarizer::summarize_all(&log))
    }
}

impl Stage for AuditLoggerStage {
    fn name(&self) -> &'static str {
        "audit"
    }

    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn run(&self) -> Result<StageReport, StageError> {
        let trails = self.build_trail()?;
        self.writer.write(&trails)?;

        tracing::info!(
            entries = trails.len(),
            path = %self.writer.path().display(),
            "Audit trail written"
        );

        Ok(StageReport {
            processed: trails.len(),
            failed: trails
                .iter()
                .filter(|t| !t.final_status.is_pass())
                .count(),
            output: Some(self.writer.path().to_path_buf()),
            ..StageReport::new(self.name())
        })
    }
}
