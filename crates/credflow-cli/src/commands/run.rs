//! `credflow run|limits|merge|audit`.

use anyhow::{Context, Result};
use credflow_audit::AuditTrailWriter;
use credflow_core::PipelineConfig;
use credflow_runtime::{
    AuditLoggerStage, LimitSetterStage, MergerStage, Pipeline, PipelineReport, build_generator,
};

/// Which stages a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSelection {
    All,
    Limits,
    Merge,
    Audit,
}

/// Assemble the pipeline for a selection.
pub fn build_pipeline(config: &PipelineConfig, selection: StageSelection) -> Pipeline {
    match selection {
        StageSelection::All => Pipeline::from_config(config, build_generator(&config.summary)),
        StageSelection::Limits => Pipeline::new().with_stage(LimitSetterStage::from_config(
            config,
            build_generator(&config.summary),
        )),
        StageSelection::Merge => Pipeline::new().with_stage(MergerStage::from_config(config)),
        StageSelection::Audit => Pipeline::new().with_stage(AuditLoggerStage::from_config(config)),
    }
}

/// Run the selected stages and print their reports.
///
/// Stage failures are logged and reported; they do not fail the command.
pub fn run(config: &PipelineConfig, selection: StageSelection, print_trail: bool) -> Result<()> {
    let report = build_pipeline(config, selection).run();
    print_report(&report);

    if print_trail && report.outcome("audit").is_some_and(|o| o.result.is_ok()) {
        let path = config.resolve(&config.paths.audit_trail);
        let trail = AuditTrailWriter::new(&path)
            .read()
            .with_context(|| format!("failed to read audit trail {}", path.display()))?;

        println!();
        for entry in &trail {
            println!("{}", entry.to_log_line());
        }
    }

    Ok(())
}

fn print_report(report: &PipelineReport) {
    println!("Run {}", report.run_id);
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(stage) => println!("  ✓ {}", stage),
            Err(err) => println!("  ✗ {} ({}): {}", outcome.stage, outcome.agent_id, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_single_stage_selections() {
        let config = PipelineConfig::default();
        assert_eq!(build_pipeline(&config, StageSelection::All).stage_names().len(), 3);
        assert_eq!(
            build_pipeline(&config, StageSelection::Merge).stage_names(),
            vec!["merge"]
        );
        assert_eq!(
            build_pipeline(&config, StageSelection::Audit).stage_names(),
            vec!["audit"]
        );
    }

    #[test]
    fn test_audit_with_print_reads_written_trail() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig {
            base_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let log_path = config.resolve(&config.paths.unified_log);
        fs::create_dir_all(log_path.parent().unwrap()).unwrap();
        fs::write(
            &log_path,
            json!({ "workflows": [{ "workflow_id": "WF-1", "customer_id": "C1", "logs": [] }] })
                .to_string(),
        )
        .unwrap();

        run(&config, StageSelection::Audit, true).unwrap();
        assert!(config.resolve(&config.paths.audit_trail).exists());
    }

    #[test]
    fn test_failed_stage_does_not_fail_command() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig {
            base_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        run(&config, StageSelection::Audit, true).unwrap();
        assert!(!config.resolve(&config.paths.audit_trail).exists());
    }
}
