//! Process configuration for the CLI.
//!
//! # Responsibility
//! - Declare the global flags and their environment fallbacks.
//! - Start core logging when a log directory is configured.
//!
//! # Invariants
//! - `--data` wins over `GREENLOG_DATA_FILE`, which wins over the default.
//! - A bad logging setup is reported but never stops the command.

use clap::Args;
use greenlog_core::{default_log_level, init_logging};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "datos_hongos.json";
pub const ENV_DATA_FILE: &str = "GREENLOG_DATA_FILE";
pub const ENV_LOG_LEVEL: &str = "GREENLOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GREENLOG_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct CliConfig {
    /// JSON file holding greenhouses and records.
    #[arg(
        long = "data",
        value_name = "PATH",
        global = true,
        env = ENV_DATA_FILE,
        default_value = DEFAULT_DATA_FILE
    )]
    pub data_file: PathBuf,
    #[arg(long, global = true, env = ENV_LOG_LEVEL, default_value = default_log_level())]
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    #[arg(long, value_name = "DIR", global = true, env = ENV_LOG_DIR)]
    pub log_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Starts file logging if a directory is configured; failures go to stderr.
    pub fn start_logging(&self) {
        let Some(log_dir) = &self.log_dir else {
            return;
        };
        if let Err(err) = init_logging(&self.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }
}
