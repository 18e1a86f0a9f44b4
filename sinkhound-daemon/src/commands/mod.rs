//! Command orchestration for the CLI subcommands.
//!
//! - `run` - the daemon loop: cycle, sleep, repeat until interrupted
//! - `once` - a single cycle, for cron-style operation and smoke tests

pub mod once;
pub mod run;

pub use once::execute_once;
pub use run::{execute_run, RunSummary};

use thiserror::Error;

use crate::cli::CliError;
use crate::io::whitelist_loader::WhitelistLoadError;

/// Errors that stop a command before the first cycle. Everything that can
/// happen inside a cycle is recoverable and never surfaces here.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] CliError),

    #[error("whitelist error: {0}")]
    Whitelist(#[from] WhitelistLoadError),
}

/// Result of command execution.
pub type CommandResult<T> = Result<T, CommandError>;
