//! Single-cycle execution.
//!
//! `once` runs exactly one ingest-classify-publish cycle against a fresh
//! store and exits. Useful under cron, and as a smoke test of the full
//! pipeline against real files. Note the store starts empty every
//! invocation: with the default count threshold, a single `once` run only
//! flags domains queried more than five times within the telemetry it can
//! see.

use sinkhound_fs::Filesystem;
use sinkhound_stats::{StatsStore, Whitelist};

use crate::cli::RunArgs;
use crate::cycle::{run_cycle, CycleOutcome, CyclePaths};
use crate::ingest::IngestCursor;
use crate::io::whitelist_loader::load_whitelist;
use crate::logger::Logger;
use crate::reload::Reloader;

use super::CommandResult;

/// Execute the once command: one cycle over a fresh store.
pub fn execute_once<F, R, L>(
    args: &RunArgs,
    fs: &F,
    reloader: &R,
    logger: &L,
) -> CommandResult<CycleOutcome>
where
    F: Filesystem,
    R: Reloader,
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

    let mut store = StatsStore::new();
    let mut cursor = IngestCursor::default();

    Ok(run_cycle(
        fs,
        &paths,
        &mut cursor,
        &whitelist,
        &thresholds,
        &mut store,
        reloader,
        logger,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{DEFAULT_RELOAD_CMD, DEFAULT_RELOAD_TIMEOUT_SEC};
    use crate::logger::MockLogger;
    use crate::reload::MockReloader;
    use sinkhound_fs::MockFilesystem;
    use std::path::{Path, PathBuf};

    fn args() -> RunArgs {
        RunArgs {
            telemetry: PathBuf::from("/var/log/suricata/eve.json"),
            policy: PathBuf::from("/etc/unbound/unbound.conf.d/sinkhole.conf"),
            count_threshold: 5,
            entropy_threshold: 3.8,
            ttl_threshold: 300.0,
            interval_sec: 300,
            whitelist: None,
            reload_cmd: DEFAULT_RELOAD_CMD.to_string(),
            reload_timeout_sec: DEFAULT_RELOAD_TIMEOUT_SEC,
        }
    }

    #[test]
    fn test_once_runs_single_cycle() {
        let fs = MockFilesystem::new();
        let mut log = String::new();
        for _ in 0..6 {
            log.push_str(
                r#"{"event_type":"dns","dns":{"type":"query","rrname":"xq9z7vv1.example.","answers":[{"ttl":60}]}}"#,
            );
            log.push('\n');
        }
        fs.add_file(PathBuf::from("/var/log/suricata/eve.json"), log.into_bytes());

        let reloader = MockReloader::succeeding();
        let logger = MockLogger::new();

        let outcome = execute_once(&args(), &fs, &reloader, &logger).expect("once");

        assert!(!outcome.had_errors());
        assert_eq!(reloader.invocations(), 1);
        let zone = fs
            .get_file(Path::new("/etc/unbound/unbound.conf.d/sinkhole.conf"))
            .unwrap();
        assert!(String::from_utf8(zone).unwrap().contains("xq9z7vv1.example"));
    }

    #[test]
    fn test_once_with_missing_telemetry_reports_ingest_error() {
        let fs = MockFilesystem::new();
        let reloader = MockReloader::succeeding();
        let logger = MockLogger::new();

        let outcome = execute_once(&args(), &fs, &reloader, &logger).expect("once");

        assert!(outcome.ingest.is_err());
        // An empty zone was still published
        assert!(outcome.publish.is_ok());
    }

    #[test]
    fn test_once_rejects_invalid_args() {
        let fs = MockFilesystem::new();
        let reloader = MockReloader::succeeding();
        let logger = MockLogger::new();
        let mut a = args();
        a.reload_cmd = String::new();

        let result = execute_once(&a, &fs, &reloader, &logger);
        assert!(matches!(
            result,
            Err(super::super::CommandError::InvalidArgument(_))
        ));
    }
}
