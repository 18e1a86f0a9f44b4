//! One pipeline cycle: ingest telemetry, then publish policy.
//!
//! The two stages are deliberately decoupled: a failed ingest still
//! publishes (the store holds everything learned so far), and a failed
//! publish never unwinds the store. The caller owns the severity decision;
//! this module only runs the stages and reports what happened.

use std::path::Path;

use sinkhound_fs::Filesystem;
use sinkhound_stats::classify::Thresholds;
use sinkhound_stats::{StatsStore, Whitelist};

use crate::ingest::{ingest_events, IngestCursor, IngestError, IngestSummary};
use crate::io::policy_writer::{PolicyWriter, PublishError, PublishSummary};
use crate::logger::Logger;
use crate::reload::Reloader;

/// Everything one cycle did, stage by stage.
#[derive(Debug)]
pub struct CycleOutcome {
    pub ingest: Result<IngestSummary, IngestError>,
    pub publish: Result<PublishSummary, PublishError>,
}

impl CycleOutcome {
    /// True if either stage reported an error.
    pub fn had_errors(&self) -> bool {
        self.ingest.is_err() || self.publish.is_err()
    }
}

/// Paths the cycle operates on.
#[derive(Debug, Clone)]
pub struct CyclePaths<'a> {
    /// The sensor's newline-delimited JSON event log.
    pub telemetry: &'a Path,
    /// The sinkhole zone file to publish.
    pub policy: &'a Path,
}

/// Run one full cycle against the given store and cursor.
pub fn run_cycle<F, R, L>(
    fs: &F,
    paths: &CyclePaths<'_>,
    cursor: &mut IngestCursor,
    whitelist: &Whitelist,
    thresholds: &Thresholds,
    store: &mut StatsStore,
    reloader: &R,
    logger: &L,
) -> CycleOutcome
where
    F: Filesystem,
    R: Reloader,
    L: Logger,
{
    let ingest = ingest_events(fs, paths.telemetry, cursor, whitelist, store, logger);
    match &ingest {
        Ok(summary) => {
            logger.verbose(&format!(
                "ingest: lines={} recorded={} malformed={} rejected={} whitelisted={}",
                summary.lines,
                summary.recorded,
                summary.malformed,
                summary.rejected,
                summary.whitelisted
            ));
        }
        Err(e) => {
            logger.info(&format!("ingest error, publishing existing stats: {e}"));
        }
    }

    let writer = PolicyWriter::new(fs, reloader, paths.policy);
    let publish = writer.publish(store, thresholds);
    match &publish {
        Ok(summary) => {
            logger.info(&format!(
                "published {}: domains={} suspicious={}",
                paths.policy.display(),
                summary.domains,
                summary.suspicious
            ));
        }
        Err(e @ PublishError::Write { .. }) => {
            logger.info(&format!("publish error, previous policy kept: {e}"));
        }
        Err(e @ PublishError::Reload(_)) => {
            logger.info(&format!("new policy on disk but not loaded: {e}"));
        }
    }

    CycleOutcome { ingest, publish }
}
