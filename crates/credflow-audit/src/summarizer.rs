//! Workflow → audit trail reduction.

use credflow_core::{UnifiedLog, ValidationStatus, Workflow};
use std::collections::BTreeMap;

use crate::trail::{AuditEvent, AuditTrailEntry, PipelineStep, StepStatus};

/// Reduces a workflow's heterogeneous log entries to an audit trail entry.
pub struct AuditSummarizer;

impl AuditSummarizer {
    /// Summarize one workflow.
    ///
    /// - Entries are scanned in log order. Entries from a known agent record
    ///   their timestamp against that agent's step; a later entry for the same
    ///   step overwrites the earlier timestamp.
    /// - Every entry, recognized agent or not, takes part in the status fold.
    ///   An empty workflow passes.
    /// - Events come out in canonical step order, one per recorded step.
    pub fn summarize(workflow: &Workflow) -> AuditTrailEntry {
        let mut executed: BTreeMap<PipelineStep, Option<String>> = BTreeMap::new();
        let mut final_status = ValidationStatus::Pass;

        for entry in &workflow.logs {
            if let Some(step) = entry.agent_id.as_deref().and_then(PipelineStep::from_agent_id) {
                executed.insert(step, entry.timestamp.clone());
            }
            final_status = final_status.and(entry.status());
        }

        let events = executed
            .into_iter()
            .map(|(step, timestamp)| AuditEvent {
                step,
                status: StepStatus::Completed,
                timestamp,
            })
            .collect();

        AuditTrailEntry {
            workflow_id: workflow.workflow_id.clone(),
            customer_id: workflow.customer_id.clone(),
            events,
            final_status,
        }
    }

    /// Summarize every workflow, preserving the log's workflow order.
    pub fn summarize_all(log: &UnifiedLog) -> Vec<AuditTrailEntry> {
        log.workflows.iter().map(Self::summarize).collect()
    }
}
