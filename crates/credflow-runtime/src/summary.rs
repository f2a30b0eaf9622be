//! Decision summary generation.
//!
//! The limit stage is built with one [`SummaryGenerator`]: the deterministic
//! [`LocalSummaryGenerator`] or the [`AzureOpenAiSummaryGenerator`]. A failed
//! summary never fails a decision; [`summarize_or_fallback`] substitutes a
//! fixed sentence and the decision keeps its status.

use credflow_core::{RemoteSummaryConfig, SummaryConfig, SummaryMode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Used when the remote client is missing configuration.
pub const FALLBACK_UNAVAILABLE: &str =
    "Generative summary unavailable due to client configuration issue.";

/// Used when a remote call fails.
pub const FALLBACK_FAILED: &str =
    "Automated summary generation failed; manual review may be required.";

const CURRENCY: &str = "USD";

const SYSTEM_PROMPT: &str = "You are a professional Financial Risk Analyst writing a concise, \
                             one-sentence summary for an audit log.";

/// Inputs describing one limit decision.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub customer_id: &'a str,
    pub risk_category: &'a str,
    pub rule_applied: &'a str,
    pub previous_limit: f64,
    pub new_limit: f64,
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summary client is not configured")]
    Unconfigured,

    #[error("summary request failed: {0}")]
    Request(String),

    #[error("summary response contained no text")]
    EmptyResponse,
}

impl SummaryError {
    /// The sentence recorded in place of a summary.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            Self::Unconfigured => FALLBACK_UNAVAILABLE,
            Self::Request(_) | Self::EmptyResponse => FALLBACK_FAILED,
        }
    }
}

/// Produces the one-sentence summary attached to a decision.
pub trait SummaryGenerator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn generate(&self, request: &SummaryRequest<'_>) -> Result<String, SummaryError>;
}

/// Generate a summary, substituting the fallback sentence on failure.
pub fn summarize_or_fallback(
    generator: &dyn SummaryGenerator,
    request: &SummaryRequest<'_>,
) -> String {
    match generator.generate(request) {
        Ok(summary) => summary,
        Err(err) => {
            tracing::error!(
                customer_id = request.customer_id,
                generator = generator.name(),
                error = %err,
                "Summary generation failed; using fallback text"
            );
            err.fallback_text().to_string()
        }
    }
}

/// Build the generator selected by configuration.
pub fn build_generator(config: &SummaryConfig) -> Box<dyn SummaryGenerator> {
    match config.mode {
        SummaryMode::Local => Box::new(LocalSummaryGenerator),
        SummaryMode::Remote => {
            if !config.remote.is_configured() {
                tracing::warn!(
                    "Azure OpenAI endpoint, deployment or key not configured; AI summaries will be disabled"
                );
            }
            Box::new(AzureOpenAiSummaryGenerator::new(config.remote.clone()))
        }
    }
}

/// Fixed-template summaries with no external calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSummaryGenerator;

impl SummaryGenerator for LocalSummaryGenerator {
    fn name(&self) -> &'static str {
        "local"
    }

    fn generate(&self, request: &SummaryRequest<'_>) -> Result<String, SummaryError> {
        tracing::debug!(customer_id = request.customer_id, "Generating local summary");

        let summary = if request.new_limit > request.previous_limit {
            let increase_percent =
                ((request.new_limit / request.previous_limit - 1.0) * 100.0).round_ties_even();
            format!(
                "The credit limit for {} Risk customer {} was increased by {}% to {} {} in accordance with the applied {}.",
                request.risk_category,
                request.customer_id,
                increase_percent,
                format_amount(request.new_limit),
                CURRENCY,
                request.rule_applied,
            )
        } else {
            format!(
                "In accordance with the {}, the credit limit for {} Risk customer {} was reviewed and maintained at {} {}.",
                request.rule_applied,
                request.risk_category,
                request.customer_id,
                format_amount(request.previous_limit),
                CURRENCY,
            )
        };
        Ok(summary)
    }
}

/// Summaries from an Azure OpenAI chat-completions deployment.
pub struct AzureOpenAiSummaryGenerator {
    config: RemoteSummaryConfig,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AzureOpenAiSummaryGenerator {
    pub fn new(config: RemoteSummaryConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Self { config, agent }
    }

    fn completions_url(&self) -> Option<String> {
        let endpoint = self.config.endpoint.as_deref()?;
        let deployment = self.config.deployment.as_deref()?;
        Some(format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            self.config.api_version,
        ))
    }

    fn request_body(&self, request: &SummaryRequest<'_>) -> serde_json::Value {
        serde_json::json!({
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(request) },
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }
}

impl SummaryGenerator for AzureOpenAiSummaryGenerator {
    fn name(&self) -> &'static str {
        "azure-openai"
    }

    fn generate(&self, request: &SummaryRequest<'_>) -> Result<String, SummaryError> {
        if !self.config.is_configured() {
            return Err(SummaryError::Unconfigured);
        }
        let (Some(url), Some(api_key)) = (self.completions_url(), self.config.api_key.as_deref())
        else {
            return Err(SummaryError::Unconfigured);
        };

        tracing::info!(
            customer_id = request.customer_id,
            deployment = self.config.deployment.as_deref().unwrap_or_default(),
            "Generating summary with Azure OpenAI"
        );

        let mut response = self
            .agent
            .post(&url)
            .header("api-key", api_key)
            .send_json(&self.request_body(request))
            .map_err(|e| SummaryError::Request(e.to_string()))?;

        let completion: ChatCompletion = response
            .body_mut()
            .read_json()
            .map_err(|e| SummaryError::Request(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(SummaryError::EmptyResponse)
    }
}

fn user_prompt(request: &SummaryRequest<'_>) -> String {
    format!(
        "Generate the summary for this event: Customer ID: {}, Risk Assessment: {} Risk, \
         Policy Applied: {}, Previous Limit: {} {}, New Limit: {} {}.",
        request.customer_id,
        request.risk_category,
        request.rule_applied,
        format_amount(request.previous_limit),
        CURRENCY,
        format_amount(request.new_limit),
        CURRENCY,
    )
}

/// Two decimals with thousands separators, e.g. `1,120.00`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}
