use clap::{Args, Parser, Subcommand};
use credflow_core::{SummaryMode, config::DEFAULT_CONFIG_FILE};
use std::path::PathBuf;

mod commands;
mod logging;

use commands::run::StageSelection;

#[derive(Parser, Debug)]
#[command(name = "credflow", version, about = "Credit limit assessment workflow")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Pipeline configuration file. Missing file means all defaults.
    #[arg(long, global = true, env = "CREDFLOW_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory relative paths resolve against (overrides the config file).
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Summary strategy: local or remote (overrides the config file).
    #[arg(long, global = true)]
    pub summary: Option<SummaryMode>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full workflow: limit setting, merge, audit logging.
    Run,

    /// Run only the limit setting stage.
    Limits,

    /// Run only the merge stage.
    Merge,

    /// Run only the audit logging stage.
    Audit {
        /// Print the audit trail as one line per workflow.
        #[arg(long, default_value_t = false)]
        print: bool,
    },

    /// Validate configuration and input files without running anything.
    Check,

    /// Write a default configuration file.
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Init { force } => commands::init::run(&cli.global.config, force)?,
        Command::Check => {
            let config = commands::load_config(&cli.global)?;
            commands::check::run(&config)?
        }
        Command::Run => run_stages(&cli.global, StageSelection::All, false)?,
        Command::Limits => run_stages(&cli.global, StageSelection::Limits, false)?,
        Command::Merge => run_stages(&cli.global, StageSelection::Merge, false)?,
        Command::Audit { print } => run_stages(&cli.global, StageSelection::Audit, print)?,
    }

    Ok(())
}

fn run_stages(global: &GlobalArgs, selection: StageSelection, print_trail: bool) -> anyhow::Result<()> {
    let config = commands::load_config(global)?;
    logging::init(&config)?;
    commands::run::run(&config, selection, print_trail)
}
