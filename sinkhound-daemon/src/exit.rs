//! Exit codes for the sinkhound CLI.
//!
//! Following Unix conventions for exit codes.

use crate::commands::CommandError;
use crate::cycle::CycleOutcome;

/// Exit code constants.
pub mod codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Invalid arguments.
    pub const INVALID_ARGS: i32 = 1;
    /// Ingest failure during a `once` cycle.
    pub const INGEST_ERROR: i32 = 3;
    /// Publish or reload failure during a `once` cycle.
    pub const PUBLISH_ERROR: i32 = 4;
    /// Whitelist load or parse error.
    pub const WHITELIST_ERROR: i32 = 6;
    /// Interrupted by signal (128 + signal number).
    pub const SIGINT: i32 = 130;
}

/// Map a CommandError to an exit code.
pub fn exit_code(error: &CommandError) -> i32 {
    match error {
        CommandError::InvalidArgument(_) => codes::INVALID_ARGS,
        CommandError::Whitelist(_) => codes::WHITELIST_ERROR,
    }
}

/// Map a `once` cycle's outcome to an exit code. Publish failures win over
/// ingest failures: enforcement not reaching the resolver is the worse
/// state.
pub fn once_exit_code(outcome: &CycleOutcome) -> i32 {
    if outcome.publish.is_err() {
        codes::PUBLISH_ERROR
    } else if outcome.ingest.is_err() {
        codes::INGEST_ERROR
    } else {
        codes::SUCCESS
    }
}
