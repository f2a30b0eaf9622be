//! Configuration types for the credflow pipeline.
//!
//! Configuration is loaded from a single YAML file (`credflow.yaml` by
//! default). Every field has a default, so an absent file yields a runnable
//! configuration pointing at the conventional `data/` layout.
//!
//! # Sections
//!
//! - **paths**: input and output files, resolved against `base_dir`
//! - **merge**: extra upstream agent log files folded into the unified log
//! - **agents**: agent ids stamped on produced records
//! - **summary**: decision-summary strategy (local template or remote model)
//! - **logging**: log level and optional log file

pub mod logging;
pub mod paths;
pub mod summary;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use logging::LoggingConfig;
pub use paths::PathsConfig;
pub use summary::{RemoteSummaryConfig, SummaryConfig, SummaryMode};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "credflow.yaml";

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory that relative paths are resolved against.
    ///
    /// Defaults to the directory holding the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Input and output file locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Merge stage settings.
    #[serde(default)]
    pub merge: MergeConfig,

    /// Agent ids.
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Decision summary generation.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Merge stage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Additional upstream agent log files (JSON arrays of log entries).
    #[serde(default)]
    pub sources: Vec<PathBuf>,
}

/// Ids of the agents that take part in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default = "default_limit_setter")]
    pub limit_setter: String,

    #[serde(default = "default_merger")]
    pub merger: String,

    #[serde(default = "default_audit_logger")]
    pub audit_logger: String,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            limit_setter: default_limit_setter(),
            merger: default_merger(),
            audit_logger: default_audit_logger(),
        }
    }
}

fn default_limit_setter() -> String {
    "LimitSetter01".to_string()
}

fn default_merger() -> String {
    "Merger01".to_string()
}

fn default_audit_logger() -> String {
    "AuditLogger01".to_string()
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Serialize to YAML (used by `credflow init`).
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::from)
    }

    /// Load a config file and anchor `base_dir` at its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;
        config.anchor(config_dir(path));
        Ok(config)
    }

    /// Like [`PipelineConfig::load`], but an absent file yields defaults
    /// anchored at the directory the file would have lived in.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.anchor(config_dir(path));
        Ok(config)
    }

    fn anchor(&mut self, dir: PathBuf) {
        self.base_dir = Some(match self.base_dir.take() {
            Some(base) if base.is_absolute() => base,
            Some(base) => dir.join(base),
            None => dir,
        });
    }

    /// The directory relative paths are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve a configured path against `base_dir`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir().join(path)
        }
    }

    /// Apply `AZURE_OPENAI_*` environment overrides to the remote summary settings.
    pub fn apply_env_overrides(&mut self) {
        self.summary.remote.apply_env_overrides();
    }

    /// Check values serde cannot express constraints for.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, id) in [
            ("agents.limit_setter", &self.agents.limit_setter),
            ("agents.merger", &self.agents.merger),
            ("agents.audit_logger", &self.agents.audit_logger),
        ] {
            if id.trim().is_empty() {
                return Err(ConfigError::Config(format!("{} must not be empty", name)));
            }
        }
        self.summary.validate()
    }
}

fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = PipelineConfig::from_yaml("{}").unwrap();
        assert_eq!(config.agents.limit_setter, "LimitSetter01");
        assert_eq!(config.agents.audit_logger, "AuditLogger01");
        assert_eq!(
            config.paths.unified_log,
            PathBuf::from("data/input/all_agents_logs.json")
        );
        assert_eq!(config.summary.mode, SummaryMode::Local);
        assert!(config.merge.sources.is_empty());
    }

    #[test]
    fn test_load_anchors_relative_paths_at_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credflow.yaml");
        fs::write(
            &path,
            "paths:\n  audit_trail: out/trail.json\nagents:\n  limit_setter: LS-9\n",
        )
        .unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.base_dir(), dir.path());
        assert_eq!(config.agents.limit_setter, "LS-9");
        assert_eq!(
            config.resolve(&config.paths.audit_trail),
            dir.path().join("out/trail.json")
        );
        // untouched keys keep their defaults
        assert_eq!(
            config.resolve(&config.paths.customers),
            dir.path().join("data/input/ERP_customer_master.json")
        );
    }

    #[test]
    fn test_relative_base_dir_is_joined_to_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credflow.yaml");
        fs::write(&path, "base_dir: workspace\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.base_dir(), dir.path().join("workspace"));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::load_or_default(dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config.base_dir(), dir.path());
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempdir().unwrap();
        let err = PipelineConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validate_rejects_blank_agent_id() {
        let mut config = PipelineConfig::default();
        config.agents.merger = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let yaml = PipelineConfig::default().to_yaml().unwrap();
        let parsed = PipelineConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.paths, PathsConfig::default());
        assert_eq!(parsed.agents, AgentsConfig::default());
    }
}
