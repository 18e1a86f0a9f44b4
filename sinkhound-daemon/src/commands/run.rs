//! The daemon loop.
//!
//! Drives one cycle after another: ingest, publish, sleep, repeat. State
//! lives here - the stats store and ingest cursor are owned by the loop and
//! lent to the stages each cycle. The loop has two states, running and
//! stopped; the only transition is the interrupt flag, checked between
//! cycles and between sleep slices.

use sinkhound_fs::Filesystem;
use sinkhound_stats::{StatsStore, Whitelist};

use crate::cli::RunArgs;
use crate::cycle::{run_cycle, CycleOutcome, CyclePaths};
use crate::ingest::{IngestCursor, IngestError};
use crate::io::policy_writer::PublishError;
use crate::io::whitelist_loader::load_whitelist;
use crate::logger::Logger;
use crate::reload::Reloader;
use crate::signal::ShutdownCheck;
use crate::sleeper::Sleeper;

use super::CommandResult;

/// Counters across the life of the loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles completed.
    pub cycles: u64,
    /// Cycles whose ingest stage failed.
    pub ingest_failures: u64,
    /// Cycles whose policy write failed (previous policy kept).
    pub publish_failures: u64,
    /// Cycles whose reload failed (new policy on disk, resolver behind).
    pub reload_failures: u64,
}

impl RunSummary {
    fn absorb(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        if outcome.ingest.is_err() {
            self.ingest_failures += 1;
        }
        match &outcome.publish {
            Ok(_) => {}
            Err(PublishError::Write { .. }) => self.publish_failures += 1,
            Err(PublishError::Reload(_)) => self.reload_failures += 1,
        }
    }
}

/// The recovery table. One place decides, per error class, whether the
/// loop survives; the stages themselves never make that call. Every class
/// is currently recoverable - the daemon is designed to outlive bad input,
/// full disks, and a wedged resolver - so a future fatal class has to be
/// added here explicitly.
fn outcome_is_fatal(outcome: &CycleOutcome) -> bool {
    let ingest_fatal = match &outcome.ingest {
        Ok(_) => false,
        Err(IngestError::InputNotFound(_)) => false,
        Err(IngestError::Read(_)) => false,
    };
    let publish_fatal = match &outcome.publish {
        Ok(_) => false,
        Err(PublishError::Write { .. }) => false,
        Err(PublishError::Reload(_)) => false,
    };
    ingest_fatal || publish_fatal
}

/// Sleep the inter-cycle interval in one-second slices so an interrupt
/// lands promptly. The interval is measured from cycle end; cadence drifts
/// by however long cycles take, which is accepted behavior.
fn sleep_interval<S: Sleeper, H: ShutdownCheck>(sleeper: &S, shutdown: &H, seconds: u64) {
    for _ in 0..seconds {
        if shutdown.should_stop() {
            return;
        }
        sleeper.sleep_sec(1);
    }
}

/// Execute the run command: loop until interrupted.
pub fn execute_run<F, R, S, H, L>(
    args: &RunArgs,
    fs: &F,
    reloader: &R,
    sleeper: &S,
    shutdown: &H,
    logger: &L,
) -> CommandResult<RunSummary>
where
    F: Filesystem,
    R: Reloader,
    S: Sleeper,
    H: ShutdownCheck,
    L: Logger,
{
    args.validate()?;

    let whitelist = match &args.whitelist {
        Some(path) => load_whitelist(fs, path)?,
        None => Whitelist::defaults(),
    };
    let thresholds = args.thresholds();
    let paths = CyclePaths {
        telemetry: &args.telemetry,
        policy: &args.policy,
    };

    logger.info(&format!(
        "sinkhound started: telemetry={} policy={} interval={}s whitelist_entries={}",
        args.telemetry.display(),
        args.policy.display(),
        args.interval_sec,
        whitelist.len()
    ));

    let mut store = StatsStore::new();
    let mut cursor = IngestCursor::default();
    let mut summary = RunSummary::default();

    while !shutdown.should_stop() {
        let outcome = run_cycle(
            fs,
            &paths,
            &mut cursor,
            &whitelist,
            &thresholds,
            &mut store,
            reloader,
            logger,
        );
        summary.absorb(&outcome);

        if outcome_is_fatal(&outcome) {
            logger.info("fatal cycle error, stopping");
            break;
        }

        sleep_interval(sleeper, shutdown, args.interval_sec);
    }

    logger.info(&format!(
        "sinkhound stopped: cycles={} ingest_failures={} publish_failures={} reload_failures={}",
        summary.cycles, summary.ingest_failures, summary.publish_failures, summary.reload_failures
    ));

    Ok(summary)
}
