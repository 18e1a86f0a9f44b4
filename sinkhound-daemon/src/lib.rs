//! sinkhound daemon library.
//!
//! Wires the pipeline stages together: telemetry ingest into the stats
//! store, classification and zone publication, the resolver reload port,
//! and the scheduler loop that drives one cycle after another until
//! interrupted.

pub mod cli;
pub mod commands;
pub mod cycle;
pub mod exit;
pub mod ingest;
pub mod io;
pub mod logger;
pub mod reload;
pub mod signal;
pub mod sleeper;

pub use cli::{Cli, CliError, Command, RunArgs};
pub use commands::{execute_once, execute_run, CommandError, RunSummary};
pub use cycle::{run_cycle, CycleOutcome, CyclePaths};
pub use ingest::{IngestCursor, IngestError, IngestSummary};
pub use logger::{Logger, MockLogger, NullLogger, StderrLogger, Verbosity};
pub use reload::{CommandReloader, MockReloader, ReloadError, Reloader};
pub use signal::{
    AlwaysShutdown, CountdownShutdown, NeverShutdown, ShutdownCheck, ShutdownFlag,
};
pub use sleeper::{MockSleeper, RealSleeper, Sleeper};
