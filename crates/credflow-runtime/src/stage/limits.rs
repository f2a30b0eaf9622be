use credflow_core::json::{read_json, write_json_pretty};
use credflow_core::{
    CustomerRecord, DecisionRecord, INDENT_4, PipelineConfig, PolicyRulesFile, RiskAssessment,
};
use credflow_policy::{LimitComputer, PolicyBook};
use std::collections::HashMap;
use std::path::PathBuf;

use super::{Stage, StageError, StageReport};
use crate::summary::{SummaryGenerator, SummaryRequest, summarize_or_fallback};

/// Sets a new credit limit for every assessed customer.
///
/// Reads the risk scores, the customer master and the policy rules, and
/// writes one [`DecisionRecord`] per assessed customer found in the master.
pub struct LimitSetterStage {
    agent_id: String,
    risk_scores: PathBuf,
    customers: PathBuf,
    policy_rules: PathBuf,
    output: PathBuf,
    summaries: Box<dyn SummaryGenerator>,
    timestamp: Option<String>,
}

/// Loaded inputs of the limit stage.
struct LimitInputs {
    assessments: Vec<RiskAssessment>,
    customers: HashMap<String, CustomerRecord>,
    policies: PolicyBook,
}

impl LimitSetterStage {
    pub fn from_config(config: &PipelineConfig, summaries: Box<dyn SummaryGenerator>) -> Self {
        Self {
            agent_id: config.agents.limit_setter.clone(),
            risk_scores: config.resolve(&config.paths.risk_scores),
            customers: config.resolve(&config.paths.customers),
            policy_rules: config.resolve(&config.paths.policy_rules),
            output: config.resolve(&config.paths.decisions),
            summaries,
            timestamp: None,
        }
    }

    /// Stamp every decision with `timestamp` instead of the current time.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    fn perceive(&self) -> Result<LimitInputs, StageError> {
        let assessments: Vec<RiskAssessment> = read_json(&self.risk_scores)?;
        let master: Vec<CustomerRecord> = read_json(&self.customers)?;
        let rules: PolicyRulesFile = read_json(&self.policy_rules)?;

        tracing::info!(
            assessments = assessments.len(),
            customers = master.len(),
            rules = rules.rules.len(),
            "Loaded limit stage inputs"
        );

        Ok(LimitInputs {
            assessments,
            customers: master
                .into_iter()
                .map(|c| (c.customer_id.clone(), c))
                .collect(),
            policies: PolicyBook::from_rules(&rules.rules),
        })
    }

    /// Produce decisions for every assessment. Returns the decisions and the
    /// number of assessments skipped for lack of a master record.
    fn decide(&self, inputs: &LimitInputs, timestamp: &str) -> (Vec<DecisionRecord>, usize) {
        let mut decisions = Vec::with_capacity(inputs.assessments.len());
        let mut skipped = 0;

        for assessment in &inputs.assessments {
            let Some(customer) = inputs.customers.get(&assessment.customer_id) else {
                tracing::warn!(
                    customer_id = %assessment.customer_id,
                    "Customer not found in master data; skipping"
                );
                skipped += 1;
                continue;
            };
            decisions.push(self.decide_one(assessment, customer, &inputs.policies, timestamp));
        }

        (decisions, skipped)
    }

    fn decide_one(
        &self,
        assessment: &RiskAssessment,
        customer: &CustomerRecord,
        policies: &PolicyBook,
        timestamp: &str,
    ) -> DecisionRecord {
        let category = assessment.category();
        let policy = policies.decide(category);
        let outcome = LimitComputer::compute(customer.current_limit, policy.directive.as_deref());

        if let Some(err) = outcome.error() {
            tracing::error!(
                customer_id = %customer.customer_id,
                rule = %policy.rule_label,
                error = %err,
                "Could not apply policy directive"
            );
        }

        let summary = summarize_or_fallback(
            self.summaries.as_ref(),
            &SummaryRequest {
                customer_id: &customer.customer_id,
                risk_category: category,
                rule_applied: &policy.rule_label,
                previous_limit: customer.current_limit,
                new_limit: outcome.raw_limit,
            },
        );

        DecisionRecord {
            customer_id: customer.customer_id.clone(),
            previous_limit: customer.current_limit,
            new_limit: outcome.new_limit,
            rule_applied: policy.rule_label,
            decision_summary: summary,
            validation_status: outcome.status,
            timestamp: timestamp.to_string(),
            agent_id: self.agent_id.clone(),
        }
    }
}

impl Stage for LimitSetterStage {
    fn name(&self) -> &'static str {
        "limits"
    }

    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn run(&self) -> Result<StageReport, StageError> {
        let timestamp = self.timestamp.clone().unwrap_or_else(crate::now_timestamp);
        let inputs = self.perceive()?;
        let (decisions, skipped) = self.decide(&inputs, &timestamp);

        let mut report = StageReport {
            processed: decisions.len(),
            skipped,
            failed: decisions
                .iter()
                .filter(|d| !d.validation_status.is_pass())
                .count(),
            ..StageReport::new(self.name())
        };

        if decisions.is_empty() {
            tracing::info!("No decisions produced; decision file left untouched");
            return Ok(report);
        }

        write_json_pretty(&self.output, &decisions, INDENT_4)?;
        tracing::info!(
            decisions = decisions.len(),
            path = %self.output.display(),
            "Credit limit decisions written"
        );
        report.output = Some(self.output.clone());
        Ok(report)
    }
}
