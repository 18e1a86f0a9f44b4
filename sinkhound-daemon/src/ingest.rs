//! Telemetry ingestion.
//!
//! Each cycle reads the sensor log from the cursor position, consumes only
//! complete lines, and folds matching DNS query events into the stats
//! store. The cursor carries the file identity so a rotated log restarts
//! from byte 0 instead of reading a stale offset into a new file.
//!
//! A malformed line is skipped, never fatal; a missing input file skips the
//! whole ingest step for the cycle. Updates applied before a read failure
//! stay in the store.

use std::path::Path;

use thiserror::Error;

use sinkhound_fs::{Filesystem, FsError};
use sinkhound_stats::{Normalizer, SensorEvent, StatsStore, Whitelist};

use crate::logger::Logger;

/// Errors from the ingest step.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("telemetry file not found: {0}")]
    InputNotFound(String),

    #[error("failed to read telemetry: {0}")]
    Read(#[from] FsError),
}

/// Read position into the telemetry file, carried across cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestCursor {
    /// Identity of the file the offset refers to.
    pub file_id: Option<u64>,
    /// Byte offset of the first unconsumed line.
    pub offset: u64,
}

/// What one ingest pass did, for the cycle status line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Complete lines consumed.
    pub lines: usize,
    /// DNS query events recorded into the store.
    pub recorded: usize,
    /// Lines that failed JSON parsing or schema checks.
    pub malformed: usize,
    /// Query names rejected by domain validation.
    pub rejected: usize,
    /// Queries dropped because the domain is whitelisted.
    pub whitelisted: usize,
}

/// Run one ingest pass over the telemetry file.
pub fn ingest_events<F: Filesystem, L: Logger>(
    fs: &F,
    path: &Path,
    cursor: &mut IngestCursor,
    whitelist: &Whitelist,
    store: &mut StatsStore,
    logger: &L,
) -> Result<IngestSummary, IngestError> {
    if !fs.exists(path) {
        return Err(IngestError::InputNotFound(path.display().to_string()));
    }

    let file_id = fs.file_id(path)?;
    if cursor.file_id != Some(file_id) {
        if cursor.file_id.is_some() {
            logger.verbose(&format!(
                "telemetry rotated, restarting from byte 0: {}",
                path.display()
            ));
        }
        cursor.file_id = Some(file_id);
        cursor.offset = 0;
    }

    let data = fs.read_from(path, cursor.offset)?;

    // Consume only complete lines; a trailing partial line stays in the
    // file for the next cycle.
    let consumed = match data.iter().rposition(|&b| b == b'\n') {
        Some(last_newline) => last_newline + 1,
        None => return Ok(IngestSummary::default()),
    };

    let normalizer = Normalizer::new();
    let mut summary = IngestSummary::default();

    for line in data[..consumed].split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        summary.lines += 1;

        let Ok(text) = std::str::from_utf8(line) else {
            summary.malformed += 1;
            logger.debug("skipped non-utf8 telemetry line");
            continue;
        };

        let event = match SensorEvent::from_json(text) {
            Ok(event) => event,
            Err(e) => {
                summary.malformed += 1;
                logger.debug(&format!("skipped malformed telemetry line: {e}"));
                continue;
            }
        };

        let Some(dns) = event.as_dns_query() else {
            continue;
        };
        let Some(rrname) = dns.rrname.as_deref() else {
            continue;
        };

        let Some(domain) = normalizer.normalize(rrname) else {
            summary.rejected += 1;
            logger.debug(&format!("rejected query name: {rrname}"));
            continue;
        };

        if whitelist.contains(&domain) {
            summary.whitelisted += 1;
            continue;
        }

        store.record(&domain, &dns.answer_ttls());
        summary.recorded += 1;
    }

    cursor.offset += consumed as u64;

    Ok(summary)
}
