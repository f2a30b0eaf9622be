//! Appending agent log entries into the unified log.
//!
//! Entries are routed to the first workflow whose `customer_id` matches the
//! entry's. Appends are at-least-once: the same entry appended twice appears
//! twice. An entry with no matching workflow is dropped with a warning; no
//! workflow is ever created here.

use credflow_core::{UnifiedLog, Workflow, WorkflowLogEntry};

/// What happened to an appended entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Appended to the workflow at this index.
    Appended(usize),
    /// No workflow for the entry's customer; the entry was dropped.
    NoWorkflow,
}

/// Counts from a batch of appends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub appended: usize,
    pub dropped: usize,
}

/// Merges log entries into per-customer workflows.
pub struct LogConsolidator;

impl LogConsolidator {
    /// Append `entry` to the first workflow with the same `customer_id`.
    pub fn append(workflows: &mut [Workflow], entry: WorkflowLogEntry) -> AppendOutcome {
        let target = entry.customer_id.as_deref().and_then(|customer_id| {
            workflows
                .iter()
                .position(|w| w.customer_id.as_deref() == Some(customer_id))
        });

        match target {
            Some(index) => {
                tracing::debug!(
                    customer_id = entry.customer_id.as_deref().unwrap_or_default(),
                    agent_id = entry.agent_id.as_deref().unwrap_or_default(),
                    "Appended log entry to unified log"
                );
                workflows[index].logs.push(entry);
                AppendOutcome::Appended(index)
            }
            None => {
                tracing::warn!(
                    customer_id = entry.customer_id.as_deref().unwrap_or("<none>"),
                    agent_id = entry.agent_id.as_deref().unwrap_or("<none>"),
                    "No existing workflow found in unified log; log not appended"
                );
                AppendOutcome::NoWorkflow
            }
        }
    }

    /// Append a batch of entries to the unified log, in order.
    pub fn append_all(
        log: &mut UnifiedLog,
        entries: impl IntoIterator<Item = WorkflowLogEntry>,
    ) -> MergeSummary {
        let mut summary = MergeSummary::default();
        for entry in entries {
            match Self::append(&mut log.workflows, entry) {
                AppendOutcome::Appended(_) => summary.appended += 1,
                AppendOutcome::NoWorkflow => summary.dropped += 1,
            }
        }
        summary
    }
}
