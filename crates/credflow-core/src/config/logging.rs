//! Logging configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and how verbosely the CLI logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Log file, truncated at the start of every run. `null` disables it.
    #[serde(default = "default_file")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: default_file(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_file() -> Option<PathBuf> {
    Some(PathBuf::from("logs/agent.log"))
}
