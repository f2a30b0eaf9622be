//! File locations used by the pipeline stages.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input and output files. Relative paths resolve against `base_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Risk score file (input).
    #[serde(default = "default_risk_scores")]
    pub risk_scores: PathBuf,

    /// Customer master file (input).
    #[serde(default = "default_customers")]
    pub customers: PathBuf,

    /// Credit policy rules file (input).
    #[serde(default = "default_policy_rules")]
    pub policy_rules: PathBuf,

    /// Limit decisions (output of the limit stage, input of the merge stage).
    #[serde(default = "default_decisions")]
    pub decisions: PathBuf,

    /// Unified log (read-modify-write by the merge stage).
    #[serde(default = "default_unified_log")]
    pub unified_log: PathBuf,

    /// Audit trail (output).
    #[serde(default = "default_audit_trail")]
    pub audit_trail: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            risk_scores: default_risk_scores(),
            customers: default_customers(),
            policy_rules: default_policy_rules(),
            decisions: default_decisions(),
            unified_log: default_unified_log(),
            audit_trail: default_audit_trail(),
        }
    }
}

fn default_risk_scores() -> PathBuf {
    PathBuf::from("data/input/Risk_score_output.json")
}

fn default_customers() -> PathBuf {
    PathBuf::from("data/input/ERP_customer_master.json")
}

fn default_policy_rules() -> PathBuf {
    PathBuf::from("config/credit_policy_rules.json")
}

fn default_decisions() -> PathBuf {
    PathBuf::from("data/output/credit_limit_update.json")
}

fn default_unified_log() -> PathBuf {
    PathBuf::from("data/input/all_agents_logs.json")
}

fn default_audit_trail() -> PathBuf {
    PathBuf::from("data/output/audit_trail.json")
}
