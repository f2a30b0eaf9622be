use credflow_core::PipelineConfig;
use uuid::Uuid;

use crate::stage::{AuditLoggerStage, LimitSetterStage, MergerStage, Stage, StageError, StageReport};
use crate::summary::SummaryGenerator;

/// Result of one stage within a run.
#[derive(Debug)]
pub struct StageOutcome {
    pub stage: &'static str,
    pub agent_id: String,
    pub result: Result<StageReport, StageError>,
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub outcomes: Vec<StageOutcome>,
}

impl PipelineReport {
    /// Whether every stage completed.
    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn outcome(&self, stage: &str) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|o| o.stage == stage)
    }
}

/// Runs stages in order. A failing stage is logged; later stages still run.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full run: limits, merge, audit.
    pub fn from_config(config: &PipelineConfig, summaries: Box<dyn SummaryGenerator>) -> Self {
        Self::new()
            .with_stage(LimitSetterStage::from_config(config, summaries))
            .with_stage(MergerStage::from_config(config))
            .with_stage(AuditLoggerStage::from_config(config))
    }

    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self) -> PipelineReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id);
        let _guard = span.enter();

        tracing::info!(stages = self.stages.len(), "Starting credit assessment workflow");

        let outcomes = self
            .stages
            .iter()
            .enumerate()
            .map(|(index, stage)| {
                tracing::info!(">>> STAGE {}: {}", index + 1, stage.name());
                let span = tracing::info_span!("stage", name = stage.name(), agent_id = stage.agent_id());
                let result = span.in_scope(|| run_stage(stage.as_ref()));
                StageOutcome {
                    stage: stage.name(),
                    agent_id: stage.agent_id().to_string(),
                    result,
                }
            })
            .collect::<Vec<_>>();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        tracing::info!(failed_stages = failed, "Workflow finished");

        PipelineReport { run_id, outcomes }
    }
}

fn run_stage(stage: &dyn Stage) -> Result<StageReport, StageError> {
    tracing::info!("--- Agent execution started ---");
    let result = stage.run();
    match &result {
        Ok(report) => tracing::info!(%report, "Stage completed"),
        Err(StageError::MissingSource(path)) => tracing::error!(
            path = %path.display(),
            "Critical data source not found; terminating stage"
        ),
        Err(err) => tracing::error!(error = %err, "Stage terminated early"),
    }
    tracing::info!("--- Agent execution finished ---");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedStage {
        name: &'static str,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl Stage for ScriptedStage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn agent_id(&self) -> &str {
            "Scripted01"
        }

        fn run(&self) -> Result<StageReport, StageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StageError::MissingSource(PathBuf::from("missing.json")))
            } else {
                Ok(StageReport::new(self.name))
            }
        }
    }

    #[test]
    fn test_failed_stage_does_not_stop_later_stages() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .with_stage(ScriptedStage { name: "first", fail: true, calls: calls.clone() })
            .with_stage(ScriptedStage { name: "second", fail: false, calls: calls.clone() });

        let report = pipeline.run();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!report.succeeded());
        assert!(report.outcome("first").unwrap().result.is_err());
        assert!(report.outcome("second").unwrap().result.is_ok());
    }

    #[test]
    fn test_full_pipeline_stage_order() {
        let pipeline = Pipeline::from_config(
            &PipelineConfig::default(),
            Box::new(crate::summary::LocalSummaryGenerator),
        );
        assert_eq!(pipeline.stage_names(), vec!["limits", "merge", "audit"]);
    }

    #[test]
    fn test_empty_pipeline_succeeds() {
        let report = Pipeline::new().run();
        assert!(report.succeeded());
        assert!(report.outcomes.is_empty());
    }
}
