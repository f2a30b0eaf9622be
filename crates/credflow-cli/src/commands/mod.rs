//! CLI command implementations.

pub mod check;
pub mod init;
pub mod run;

use anyhow::{Context, Result};
use credflow_core::PipelineConfig;

use crate::GlobalArgs;

/// Load the pipeline configuration and apply CLI and environment overrides.
///
/// Precedence, highest first: CLI flags, `AZURE_OPENAI_*` environment
/// variables, the config file, built-in defaults.
pub fn load_config(args: &GlobalArgs) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load_or_default(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;

    config.apply_env_overrides();
    if let Some(base_dir) = &args.base_dir {
        config.base_dir = Some(base_dir.clone());
    }
    if let Some(mode) = args.summary {
        config.summary.mode = mode;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use credflow_core::SummaryMode;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credflow.yaml");
        fs::write(&path, "summary:\n  mode: remote\n").unwrap();

        let args = GlobalArgs {
            config: path,
            base_dir: Some(PathBuf::from("/srv/credit")),
            summary: Some(SummaryMode::Local),
        };
        let config = load_config(&args).unwrap();

        assert_eq!(config.summary.mode, SummaryMode::Local);
        assert_eq!(config.base_dir(), PathBuf::from("/srv/credit"));
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let args = GlobalArgs {
            config: dir.path().join("absent.yaml"),
            base_dir: None,
            summary: None,
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.agents.limit_setter, "LimitSetter01");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credflow.yaml");
        fs::write(&path, "agents:\n  merger: \"  \"\n").unwrap();

        let args = GlobalArgs {
            config: path,
            base_dir: None,
            summary: None,
        };
        assert!(load_config(&args).is_err());
    }
}
