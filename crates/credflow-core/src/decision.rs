//! Limit decisions and the PASS/FAIL validation status.

use serde::{Deserialize, Serialize};

/// Outcome of validating a single pipeline step.
///
/// Serialized as `"PASS"` / `"FAIL"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    #[default]
    Pass,
    Fail,
}

impl ValidationStatus {
    /// Interpret a raw status string from a foreign log entry.
    ///
    /// Anything other than an exact `"PASS"` counts as a failure, including
    /// a missing status.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("PASS") => Self::Pass,
            _ => Self::Fail,
        }
    }

    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Fold two statuses: a single failure fails the whole.
    pub fn and(self, other: Self) -> Self {
        if self.is_pass() && other.is_pass() {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The credit-limit decision for one customer in one run.
///
/// Created once per customer by the limit stage, written to the decision
/// output file and later appended to the customer's workflow in the unified
/// log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub customer_id: String,
    pub previous_limit: f64,
    /// New limit rounded to two decimal places.
    pub new_limit: f64,
    /// Label of the applied rule, or `"No Matching Policy"`.
    pub rule_applied: String,
    pub decision_summary: String,
    pub validation_status: ValidationStatus,
    pub timestamp: String,
    /// Id of the agent that produced the decision.
    pub agent_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_raw() {
        assert_eq!(ValidationStatus::from_raw(Some("PASS")), ValidationStatus::Pass);
        assert_eq!(ValidationStatus::from_raw(Some("FAIL")), ValidationStatus::Fail);
        assert_eq!(ValidationStatus::from_raw(Some("pass")), ValidationStatus::Fail);
        assert_eq!(ValidationStatus::from_raw(Some("WARN")), ValidationStatus::Fail);
        assert_eq!(ValidationStatus::from_raw(None), ValidationStatus::Fail);
    }

    #[test]
    fn test_status_fold() {
        use ValidationStatus::*;
        assert_eq!(Pass.and(Pass), Pass);
        assert_eq!(Pass.and(Fail), Fail);
        assert_eq!(Fail.and(Pass), Fail);
    }

    #[test]
    fn test_decision_json_preserves_fields() {
        let records = vec![
            DecisionRecord {
                customer_id: "CUST-001".to_string(),
                previous_limit: 1000.0,
                new_limit: 1120.0,
                rule_applied: "Low Risk Policy".to_string(),
                decision_summary: "increased".to_string(),
                validation_status: ValidationStatus::Pass,
                timestamp: "2025-01-01T00:00:00".to_string(),
                agent_id: "LimitSetter01".to_string(),
            },
            DecisionRecord {
                customer_id: "CUST-002".to_string(),
                previous_limit: 2500.5,
                new_limit: 2650.53,
                rule_applied: "Medium Risk Policy".to_string(),
                decision_summary: "increased".to_string(),
                validation_status: ValidationStatus::Fail,
                timestamp: "2025-01-01T00:00:00".to_string(),
                agent_id: "LimitSetter01".to_string(),
            },
        ];

        let text = serde_json::to_string_pretty(&records).unwrap();
        assert!(text.contains("\"validation_status\": \"FAIL\""));
        assert!(text.contains("\"agent_id\": \"LimitSetter01\""));

        let parsed: Vec<DecisionRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, records);
        assert_eq!(parsed[1].new_limit, 2650.53);
    }
}
