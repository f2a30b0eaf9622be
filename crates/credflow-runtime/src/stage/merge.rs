use credflow_audit::{AuditError, LogConsolidator, UnifiedLogStore, load_log_entries};
use credflow_core::json::read_json;
use credflow_core::{DecisionRecord, PipelineConfig, WorkflowLogEntry};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use super::{Stage, StageError, StageReport};

/// Slack for filesystem timestamp granularity when comparing against the
/// run start.
const MTIME_TOLERANCE: Duration = Duration::from_secs(2);

/// Appends agent log entries to the unified log.
///
/// Upstream sources (`merge.sources`) are merged first, in configured order,
/// followed by the limit decisions. The unified log and the decision file are
/// required; upstream sources are optional.
///
/// Merging is not deduplicated. A decision file older than the current run
/// was most likely merged already, so the stage warns before appending it.
pub struct MergerStage {
    agent_id: String,
    decisions: PathBuf,
    sources: Vec<PathBuf>,
    store: UnifiedLogStore,
    run_started: SystemTime,
}

impl MergerStage {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            agent_id: config.agents.merger.clone(),
            decisions: config.resolve(&config.paths.decisions),
            sources: config
                .merge
                .sources
                .iter()
                .map(|source| config.resolve(source))
                .collect(),
            store: UnifiedLogStore::new(config.resolve(&config.paths.unified_log)),
            run_started: SystemTime::now(),
        }
    }

    /// Treat `started` as the start of the run when checking decision file age.
    pub fn with_run_started(mut self, started: SystemTime) -> Self {
        self.run_started = started;
        self
    }

    fn warn_if_stale(&self) {
        let modified = fs::metadata(&self.decisions).and_then(|m| m.modified());
        match modified {
            Ok(modified) if predates(modified, self.run_started) => {
                tracing::warn!(
                    path = %self.decisions.display(),
                    "Decision file predates this run; its decisions may already be in the unified log"
                );
            }
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(error = %err, "Decision file modification time unavailable");
            }
        }
    }

    /// Read every optional source. Unreadable sources are logged and counted.
    fn collect_upstream(&self) -> (Vec<WorkflowLogEntry>, usize) {
        let mut entries = Vec::new();
        let mut skipped = 0;

        for source in &self.sources {
            match load_log_entries(source) {
                Ok(loaded) => {
                    tracing::info!(
                        path = %source.display(),
                        entries = loaded.len(),
                        "Loaded upstream agent log"
                    );
                    entries.extend(loaded);
                }
                Err(AuditError::MissingSource(path)) => {
                    tracing::warn!(path = %path.display(), "Upstream agent log not found; skipping");
                    skipped += 1;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Upstream agent log unreadable; skipping");
                    skipped += 1;
                }
            }
        }

        (entries, skipped)
    }
}

impl Stage for MergerStage {
    fn name(&self) -> &'static str {
        "merge"
    }

    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn run(&self) -> Result<StageReport, StageError> {
        let mut log = self.store.load()?;
        let decisions: Vec<DecisionRecord> = read_json(&self.decisions)?;
        self.warn_if_stale();
        let (mut entries, skipped_sources) = self.collect_upstream();
        entries.extend(decisions.iter().map(WorkflowLogEntry::from));

        let failed = entries.iter().filter(|e| !e.status().is_pass()).count();
        let merged = LogConsolidator::append_all(&mut log, entries);
        self.store.save(&log)?;

        tracing::info!(
            appended = merged.appended,
            dropped = merged.dropped,
            path = %self.store.path().display(),
            "Unified log updated"
        );

        Ok(StageReport {
            processed: merged.appended,
            skipped: merged.dropped + skipped_sources,
            failed,
            output: Some(self.store.path().to_path_buf()),
            ..StageReport::new(self.name())
        })
    }
}

fn predates(modified: SystemTime, started: SystemTime) -> bool {
    modified + MTIME_TOLERANCE < started
}
