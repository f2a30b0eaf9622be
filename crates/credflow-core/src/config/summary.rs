//! Decision summary configuration.
//!
//! The limit stage attaches a one-sentence summary to every decision. The
//! sentence comes either from a deterministic local template or from an Azure
//! OpenAI chat deployment. Credentials for the remote path are normally
//! supplied through the environment (`AZURE_OPENAI_*`), optionally via `.env`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ConfigError;

pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";

/// Which summary strategy the limit stage is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// Fixed-template sentence, no network access.
    #[default]
    Local,
    /// Azure OpenAI chat completion.
    Remote,
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for SummaryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(ConfigError::Config(format!(
                "unknown summary mode '{}' (expected 'local' or 'remote')",
                other
            ))),
        }
    }
}

/// Summary generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default)]
    pub mode: SummaryMode,

    #[serde(default)]
    pub remote: RemoteSummaryConfig,
}

impl SummaryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let remote = &self.remote;
        if remote.max_tokens == 0 {
            return Err(ConfigError::Config(
                "summary.remote.max_tokens must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&remote.temperature) {
            return Err(ConfigError::Config(format!(
                "summary.remote.temperature {} is outside 0.0..=2.0",
                remote.temperature
            )));
        }
        Ok(())
    }
}

/// Azure OpenAI chat deployment settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteSummaryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// e.g. `https://my-resource.openai.azure.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteSummaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            deployment: None,
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Keeps the API key out of debug logs.
impl fmt::Debug for RemoteSummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSummaryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RemoteSummaryConfig {
    /// True when endpoint, deployment and key are all present.
    pub fn is_configured(&self) -> bool {
        [&self.api_key, &self.endpoint, &self.deployment]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    /// Override fields from `AZURE_OPENAI_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override fields from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_API_KEY) {
            self.api_key = Some(v);
        }
        if let Some(v) = get(ENV_ENDPOINT) {
            self.endpoint = Some(v);
        }
        if let Some(v) = get(ENV_DEPLOYMENT) {
            self.deployment = Some(v);
        }
        if let Some(v) = get(ENV_API_VERSION) {
            self.api_version = v;
        }
    }
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

fn default_max_tokens() -> u32 {
    100
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}
