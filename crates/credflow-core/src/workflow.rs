//! Unified log types: workflows and the heterogeneous entries agents append.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decision::{DecisionRecord, ValidationStatus};
use crate::lenient;

/// A log entry produced by any agent in the pipeline.
///
/// Only `agent_id`, `timestamp` and `validation_status` matter for audit
/// summarization; `customer_id` routes the entry to its workflow. Every other
/// field is carried opaquely in `payload`. The named fields accept numbers
/// as well as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowLogEntry {
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub agent_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub validation_status: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl WorkflowLogEntry {
    pub fn new(
        agent_id: impl Into<String>,
        customer_id: impl Into<String>,
        timestamp: impl Into<String>,
        status: ValidationStatus,
    ) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            customer_id: Some(customer_id.into()),
            timestamp: Some(timestamp.into()),
            validation_status: Some(status.as_str().to_string()),
            payload: Map::new(),
        }
    }

    /// Attach an extra payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// The entry's status; a missing or unknown status is a failure.
    pub fn status(&self) -> ValidationStatus {
        ValidationStatus::from_raw(self.validation_status.as_deref())
    }
}

impl From<&DecisionRecord> for WorkflowLogEntry {
    fn from(record: &DecisionRecord) -> Self {
        Self::new(
            record.agent_id.as_str(),
            record.customer_id.as_str(),
            record.timestamp.as_str(),
            record.validation_status,
        )
        .with_field("previous_limit", record.previous_limit)
        .with_field("new_limit", record.new_limit)
        .with_field("rule_applied", record.rule_applied.as_str())
        .with_field("decision_summary", record.decision_summary.as_str())
    }
}

/// One customer's workflow in the unified log.
///
/// Identity is `customer_id`; `workflow_id` is a pass-through label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub workflow_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_id: Option<String>,
    /// `null` or a non-array value reads as no entries.
    #[serde(default, deserialize_with = "lenient::list_or_empty")]
    pub logs: Vec<WorkflowLogEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workflow {
    pub fn new(workflow_id: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self {
            workflow_id: Some(workflow_id.into()),
            customer_id: Some(customer_id.into()),
            logs: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_log(mut self, entry: WorkflowLogEntry) -> Self {
        self.logs.push(entry);
        self
    }
}

/// The unified log file: `{ "workflows": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedLog {
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UnifiedLog {
    pub fn new(workflows: Vec<Workflow>) -> Self {
        Self {
            workflows,
            extra: Map::new(),
        }
    }

    /// Total number of log entries across all workflows.
    pub fn entry_count(&self) -> usize {
        self.workflows.iter().map(|w| w.logs.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let text = r#"{
            "generated_by": "upstream",
            "workflows": [
                {
                    "workflow_id": "WF-1",
                    "customer_id": "C1",
                    "region": "EMEA",
                    "logs": [
                        {
                            "agent_id": "RiskScoring01",
                            "customer_id": "C1",
                            "timestamp": "t1",
                            "validation_status": "PASS",
                            "risk_score": 0.42
                        }
                    ]
                }
            ]
        }"#;

        let log: UnifiedLog = serde_json::from_str(text).unwrap();
        assert_eq!(log.extra.get("generated_by"), Some(&Value::from("upstream")));
        assert_eq!(log.workflows[0].extra.get("region"), Some(&Value::from("EMEA")));
        assert_eq!(
            log.workflows[0].logs[0].payload.get("risk_score"),
            Some(&Value::from(0.42))
        );

        let back: UnifiedLog = serde_json::from_value(serde_json::to_value(&log).unwrap()).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn test_workflow_without_logs_key() {
        let workflow: Workflow =
            serde_json::from_str(r#"{"workflow_id": "WF-9", "customer_id": "C9"}"#).unwrap();
        assert!(workflow.logs.is_empty());
    }

    #[test]
    fn test_entry_from_decision() {
        let record = DecisionRecord {
            customer_id: "C1".to_string(),
            previous_limit: 1000.0,
            new_limit: 1120.0,
            rule_applied: "Low Risk Policy".to_string(),
            decision_summary: "summary".to_string(),
            validation_status: ValidationStatus::Pass,
            timestamp: "t3".to_string(),
            agent_id: "LimitSetter01".to_string(),
        };

        let entry = WorkflowLogEntry::from(&record);
        assert_eq!(entry.agent_id.as_deref(), Some("LimitSetter01"));
        assert_eq!(entry.customer_id.as_deref(), Some("C1"));
        assert_eq!(entry.status(), ValidationStatus::Pass);
        assert_eq!(entry.payload.get("new_limit"), Some(&Value::from(1120.0)));
        assert_eq!(
            entry.payload.get("rule_applied"),
            Some(&Value::from("Low Risk Policy"))
        );
    }

    #[test]
    fn test_numeric_ids_and_null_logs_are_tolerated() {
        let text = r#"{
            "workflows": [
                { "workflow_id": 7, "customer_id": 1001, "logs": null },
                { "workflow_id": "WF-2", "customer_id": "C2", "logs": "pending" },
                {
                    "workflow_id": "WF-3",
                    "customer_id": "C3",
                    "logs": [
                        {
                            "agent_id": "RiskScoring01",
                            "customer_id": 3,
                            "timestamp": 1735725600,
                            "validation_status": null
                        }
                    ]
                }
            ]
        }"#;

        let log: UnifiedLog = serde_json::from_str(text).unwrap();
        assert_eq!(log.workflows[0].workflow_id.as_deref(), Some("7"));
        assert_eq!(log.workflows[0].customer_id.as_deref(), Some("1001"));
        assert!(log.workflows[0].logs.is_empty());
        assert!(log.workflows[1].logs.is_empty());

        let entry = &log.workflows[2].logs[0];
        assert_eq!(entry.customer_id.as_deref(), Some("3"));
        assert_eq!(entry.timestamp.as_deref(), Some("1735725600"));
        assert_eq!(entry.validation_status, None);
        assert_eq!(entry.status(), ValidationStatus::Fail);
        assert_eq!(log.entry_count(), 1);
    }

    #[test]
    fn test_entry_without_status_is_failure() {
        let entry: WorkflowLogEntry =
            serde_json::from_str(r#"{"agent_id": "ExposureAggregator01"}"#).unwrap();
        assert_eq!(entry.status(), ValidationStatus::Fail);
    }
}
