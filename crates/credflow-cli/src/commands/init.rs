//! `credflow init` command implementation.
//!
//! Writes a default `credflow.yaml` and, next to it, a starter policy rules
//! file plus the input and output directories the default paths point at.

use anyhow::{Context, Result};
use credflow_core::json::write_json_pretty;
use credflow_core::{INDENT_4, PipelineConfig, PolicyRule, PolicyRulesFile};
use std::fs;
use std::path::Path;

/// Rules written to a fresh project.
fn starter_rules() -> PolicyRulesFile {
    PolicyRulesFile {
        rules: vec![
            PolicyRule::new("Low", "Increase limit by 10%"),
            PolicyRule::new("Medium", "Increase limit by 5%"),
            PolicyRule::new("High", "Maintain current limit"),
        ],
    }
}

/// Run `credflow init`.
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file '{}' already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = PipelineConfig::default();
    let yaml = config.to_yaml().context("failed to render default configuration")?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(config_path, yaml)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    println!("Wrote {}", config_path.display());

    let anchored = PipelineConfig::load(config_path)
        .with_context(|| format!("failed to reload {}", config_path.display()))?;
    let paths = &anchored.paths;

    for file in [&paths.risk_scores, &paths.decisions, &paths.audit_trail] {
        if let Some(dir) = anchored.resolve(file).parent() {
            fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        }
    }

    let rules_path = anchored.resolve(&paths.policy_rules);
    if rules_path.exists() {
        println!("Keeping existing {}", rules_path.display());
    } else {
        write_json_pretty(&rules_path, &starter_rules(), INDENT_4)
            .with_context(|| format!("failed to write {}", rules_path.display()))?;
        println!("Wrote {}", rules_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  1. Place risk scores, the customer master and the unified log under data/input/");
    println!("  2. Run `credflow check`");
    println!("  3. Run `credflow run`");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use credflow_core::json::read_json;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_loadable_config_and_rules() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("credflow.yaml");

        run(&config_path, false).unwrap();

        let config = PipelineConfig::load(&config_path).unwrap();
        assert_eq!(config.agents.limit_setter, "LimitSetter01");
        assert!(dir.path().join("data/input").is_dir());
        assert!(dir.path().join("data/output").is_dir());

        let rules: PolicyRulesFile =
            read_json(&dir.path().join("config/credit_policy_rules.json")).unwrap();
        assert_eq!(rules, starter_rules());
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("credflow.yaml");
        fs::write(&config_path, "summary:\n  mode: remote\n").unwrap();

        assert!(run(&config_path, false).is_err());
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "summary:\n  mode: remote\n"
        );

        run(&config_path, true).unwrap();
        let config = PipelineConfig::load(&config_path).unwrap();
        assert_eq!(config.summary.mode, credflow_core::SummaryMode::Local);
    }

    #[test]
    fn test_init_keeps_existing_rules() {
        let dir = tempdir().unwrap();
        let rules_path = dir.path().join("config/credit_policy_rules.json");
        fs::create_dir_all(rules_path.parent().unwrap()).unwrap();
        fs::write(&rules_path, r#"{"rules": []}"#).unwrap();

        run(&dir.path().join("credflow.yaml"), false).unwrap();
        assert_eq!(fs::read_to_string(&rules_path).unwrap(), r#"{"rules": []}"#);
    }

    #[test]
    fn test_initialized_project_only_lacks_inputs() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("credflow.yaml");
        run(&config_path, false).unwrap();

        let config = PipelineConfig::load(&config_path).unwrap();
        let results = super::super::check::run_quiet(&config);
        let categories: Vec<_> = results.findings.iter().map(|f| f.category).collect();
        assert_eq!(categories, vec!["risk_scores", "customers", "unified_log"]);
    }
}
