//! Audit trail types.
//!
//! An [`AuditTrailEntry`] is the read-only summary of one workflow: the
//! pipeline steps that ran, in canonical order, and the aggregate status.

use credflow_core::ValidationStatus;
use serde::{Deserialize, Serialize};

/// A named step of the credit assessment pipeline.
///
/// Variant order is the canonical step order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PipelineStep {
    #[serde(rename = "Exposure Aggregation")]
    ExposureAggregation,
    #[serde(rename = "Risk Scoring")]
    RiskScoring,
    #[serde(rename = "Limit Setting")]
    LimitSetting,
    #[serde(rename = "Compliance Check")]
    ComplianceCheck,
}

impl PipelineStep {
    /// All steps in canonical order.
    pub const ALL: [PipelineStep; 4] = [
        Self::ExposureAggregation,
        Self::RiskScoring,
        Self::LimitSetting,
        Self::ComplianceCheck,
    ];

    /// Resolve the producing agent's id to its step.
    pub fn from_agent_id(agent_id: &str) -> Option<Self> {
        match agent_id {
            "ExposureAggregator01" => Some(Self::ExposureAggregation),
            "RiskScoring01" => Some(Self::RiskScoring),
            "LimitSetter01" => Some(Self::LimitSetting),
            "ComplianceChecker01" => Some(Self::ComplianceCheck),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ExposureAggregation => "Exposure Aggregation",
            Self::RiskScoring => "Risk Scoring",
            Self::LimitSetting => "Limit Setting",
            Self::ComplianceCheck => "Compliance Check",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of a recorded step. Only completed steps are recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    #[default]
    Completed,
}

/// One step in an audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub step: PipelineStep,
    pub status: StepStatus,
    /// Timestamp of the last log entry seen for this step.
    pub timestamp: Option<String>,
}

/// Summary of one workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrailEntry {
    pub workflow_id: Option<String>,
    pub customer_id: Option<String>,
    pub events: Vec<AuditEvent>,
    /// `FAIL` if any log entry of the workflow was not `PASS`.
    pub final_status: ValidationStatus,
}

impl AuditTrailEntry {
    /// Format the entry as a human-readable line.
    ///
    /// Format: `[STATUS] workflow=... customer=... steps=Step@ts > Step@ts`
    pub fn to_log_line(&self) -> String {
        let steps = if self.events.is_empty() {
            "none".to_string()
        } else {
            self.events
                .iter()
                .map(|e| format!("{}@{}", e.step, e.timestamp.as_deref().unwrap_or("-")))
                .collect::<Vec<_>>()
                .join(" > ")
        };

        format!(
            "[{}] workflow={} customer={} steps={}",
            self.final_status,
            self.workflow_id.as_deref().unwrap_or("-"),
            self.customer_id.as_deref().unwrap_or("-"),
            steps,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_follows_variants() {
        let mut steps = vec![
            PipelineStep::ComplianceCheck,
            PipelineStep::ExposureAggregation,
            PipelineStep::LimitSetting,
            PipelineStep::RiskScoring,
        ];
        steps.sort();
        assert_eq!(steps, PipelineStep::ALL);
    }

    #[test]
    fn test_agent_lookup() {
        assert_eq!(
            PipelineStep::from_agent_id("LimitSetter01"),
            Some(PipelineStep::LimitSetting)
        );
        assert_eq!(PipelineStep::from_agent_id("AuditLogger01"), None);
    }

    #[test]
    fn test_event_json_shape() {
        let event = AuditEvent {
            step: PipelineStep::RiskScoring,
            status: StepStatus::Completed,
            timestamp: Some("2025-01-01T10:00:00".to_string()),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "step": "Risk Scoring",
                "status": "Completed",
                "timestamp": "2025-01-01T10:00:00"
            })
        );
    }

    #[test]
    fn test_to_log_line() {
        let entry = AuditTrailEntry {
            workflow_id: Some("WF-1".to_string()),
            customer_id: Some("C1".to_string()),
            events: vec![
                AuditEvent {
                    step: PipelineStep::ExposureAggregation,
                    status: StepStatus::Completed,
                    timestamp: Some("t1".to_string()),
                },
                AuditEvent {
                    step: PipelineStep::RiskScoring,
                    status: StepStatus::Completed,
                    timestamp: None,
                },
            ],
            final_status: ValidationStatus::Fail,
        };

        assert_eq!(
            entry.to_log_line(),
            "[FAIL] workflow=WF-1 customer=C1 steps=Exposure Aggregation@t1 > Risk Scoring@-"
        );
    }
}
