//! Input file shapes: risk scores, customer master and policy rules.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::lenient;

/// Risk category used when a risk record carries none.
pub const UNKNOWN_RISK_CATEGORY: &str = "Unknown";

/// One row of the risk score file, produced upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(deserialize_with = "lenient::required_string")]
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_category: Option<String>,
}

impl RiskAssessment {
    pub fn new(customer_id: impl Into<String>, risk_category: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            risk_category: Some(risk_category.into()),
        }
    }

    /// The risk category, defaulting to `"Unknown"`.
    pub fn category(&self) -> &str {
        self.risk_category.as_deref().unwrap_or(UNKNOWN_RISK_CATEGORY)
    }
}

/// One row of the customer master (ERP) file.
///
/// Only `customer_id` and `current_limit` are used; everything else is kept
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(deserialize_with = "lenient::required_string")]
    pub customer_id: String,
    /// Accepts a JSON number or a numeric string.
    #[serde(deserialize_with = "deserialize_limit")]
    pub current_limit: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomerRecord {
    pub fn new(customer_id: impl Into<String>, current_limit: f64) -> Self {
        Self {
            customer_id: customer_id.into(),
            current_limit,
            extra: Map::new(),
        }
    }
}

fn deserialize_limit<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLimit {
        Number(f64),
        Text(String),
    }

    match RawLimit::deserialize(deserializer)? {
        RawLimit::Number(n) => Ok(n),
        RawLimit::Text(s) => s.trim().parse::<f64>().map_err(|e| {
            serde::de::Error::custom(format!("invalid current_limit '{}': {}", s, e))
        }),
    }
}

/// A single policy rule: `condition` is a risk category, `action` an
/// uninterpreted directive such as `"Increase limit by 12%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub condition: String,
    pub action: String,
}

impl PolicyRule {
    pub fn new(condition: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            action: action.into(),
        }
    }
}

/// The credit policy rules file: `{ "rules": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRulesFile {
    pub rules: Vec<PolicyRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_risk_category_defaults_to_unknown() {
        let record: RiskAssessment = serde_json::from_str(r#"{"customer_id": "C1"}"#).unwrap();
        assert_eq!(record.category(), "Unknown");
    }

    #[test]
    fn test_customer_limit_accepts_number_and_string() {
        let customers: Vec<CustomerRecord> = serde_json::from_str(
            r#"[
                {"customer_id": "C1", "current_limit": 1000, "name": "Acme"},
                {"customer_id": "C2", "current_limit": " 2500.50 "}
            ]"#,
        )
        .unwrap();

        assert_eq!(customers[0].current_limit, 1000.0);
        assert_eq!(customers[0].extra.get("name"), Some(&Value::from("Acme")));
        assert_eq!(customers[1].current_limit, 2500.5);
    }

    #[test]
    fn test_customer_limit_rejects_garbage() {
        let result: Result<CustomerRecord, _> =
            serde_json::from_str(r#"{"customer_id": "C1", "current_limit": "lots"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_customer_ids_read_as_strings() {
        let record: RiskAssessment =
            serde_json::from_str(r#"{"customer_id": 1001, "risk_category": "Low"}"#).unwrap();
        assert_eq!(record.customer_id, "1001");

        let customer: CustomerRecord =
            serde_json::from_str(r#"{"customer_id": 1001, "current_limit": 500}"#).unwrap();
        assert_eq!(customer.customer_id, "1001");

        let missing: Result<CustomerRecord, _> =
            serde_json::from_str(r#"{"customer_id": null, "current_limit": 500}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_rules_file_requires_rules_key() {
        let result: Result<PolicyRulesFile, _> = serde_json::from_str(r#"{"policies": []}"#);
        assert!(result.is_err());
    }
}
