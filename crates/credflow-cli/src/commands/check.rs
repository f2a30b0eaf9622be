//! `credflow check` command implementation.
//!
//! Validates a pipeline configuration before a run:
//! - required input files exist and parse
//! - policy rules have no duplicate conditions
//! - optional merge sources exist
//! - remote summary settings are complete when selected

use anyhow::Result;
use credflow_audit::PipelineStep;
use credflow_core::json::read_json;
use credflow_core::{
    CustomerRecord, JsonFileError, PipelineConfig, PolicyRulesFile, RiskAssessment, SummaryMode,
    UnifiedLog,
};
use credflow_policy::PolicyBook;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};

/// Severity level for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single check finding.
#[derive(Debug, Clone)]
pub struct CheckFinding {
    pub severity: Severity,
    /// Category of the check that produced this finding.
    pub category: &'static str,
    pub message: String,
    pub file: Option<PathBuf>,
}

impl CheckFinding {
    fn error(category: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message: message.into(),
            file: None,
        }
    }

    fn warning(category: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            category,
            message: message.into(),
            file: None,
        }
    }

    fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for CheckFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;
        if let Some(file) = &self.file {
            write!(f, " ({})", file.display())?;
        }
        Ok(())
    }
}

/// Results from running all checks.
#[derive(Debug, Default)]
pub struct CheckResults {
    pub findings: Vec<CheckFinding>,
}

impl CheckResults {
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn print_summary(&self) {
        let mut findings: Vec<_> = self.findings.iter().collect();
        findings.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.category.cmp(b.category)));

        for finding in &findings {
            println!("  {}", finding);
        }

        println!();
        if findings.is_empty() {
            println!("All checks passed.");
        } else {
            println!(
                "Summary: {} error(s), {} warning(s)",
                self.count(Severity::Error),
                self.count(Severity::Warning)
            );
        }
    }
}

/// Run every check without printing.
pub fn run_quiet(config: &PipelineConfig) -> CheckResults {
    let mut results = CheckResults::default();

    if let Err(err) = config.validate() {
        results.findings.push(CheckFinding::error("config", err.to_string()));
    }

    let paths = &config.paths;
    check_input::<Vec<RiskAssessment>>(&mut results, "risk_scores", &config.resolve(&paths.risk_scores));
    check_input::<Vec<CustomerRecord>>(&mut results, "customers", &config.resolve(&paths.customers));
    check_input::<UnifiedLog>(&mut results, "unified_log", &config.resolve(&paths.unified_log));
    if let Some(rules) =
        check_input::<PolicyRulesFile>(&mut results, "policy_rules", &config.resolve(&paths.policy_rules))
    {
        check_policy_rules(&mut results, &rules);
    }

    for source in &config.merge.sources {
        let path = config.resolve(source);
        if !path.exists() {
            results.findings.push(
                CheckFinding::warning("merge", "upstream agent log not found; it will be skipped")
                    .with_file(path),
            );
        }
    }

    if PipelineStep::from_agent_id(&config.agents.limit_setter).is_none() {
        results.findings.push(CheckFinding::warning(
            "agents",
            format!(
                "limit setter id '{}' is not a known pipeline agent; its entries will not appear as a step in the audit trail",
                config.agents.limit_setter
            ),
        ));
    }

    if config.summary.mode == SummaryMode::Remote && !config.summary.remote.is_configured() {
        results.findings.push(CheckFinding::warning(
            "summary",
            "remote summaries selected but endpoint, deployment or API key is missing; fallback text will be used",
        ));
    }

    results
}

fn check_input<T: DeserializeOwned>(
    results: &mut CheckResults,
    category: &'static str,
    path: &Path,
) -> Option<T> {
    match read_json::<T>(path) {
        Ok(value) => Some(value),
        Err(JsonFileError::NotFound(path)) => {
            results
                .findings
                .push(CheckFinding::error(category, "critical data source not found").with_file(path));
            None
        }
        Err(err) => {
            results.findings.push(CheckFinding::error(category, err.to_string()));
            None
        }
    }
}

fn check_policy_rules(results: &mut CheckResults, rules: &PolicyRulesFile) {
    if rules.rules.is_empty() {
        results.findings.push(CheckFinding::warning(
            "policy_rules",
            "no rules defined; every customer will keep its current limit",
        ));
        return;
    }

    let book = PolicyBook::from_rules(&rules.rules);
    for condition in book.duplicate_conditions() {
        results.findings.push(CheckFinding::warning(
            "policy_rules",
            format!("duplicate condition '{}'; the last rule wins", condition),
        ));
    }
}

/// Run `credflow check`.
pub fn run(config: &PipelineConfig) -> Result<()> {
    println!("Checking credflow configuration in {}", config.base_dir().display());
    println!();

    let results = run_quiet(config);
    results.print_summary();

    if results.has_errors() {
        anyhow::bail!(
            "configuration check failed with {} error(s)",
            results.count(Severity::Error)
        );
    }
    Ok(())
}
