//! Policy publication.
//!
//! Renders the sinkhole zone for the current store, atomically replaces
//! the policy file, then asks the resolver to reload. The two failure
//! modes are kept distinct: a filesystem failure leaves the previous
//! policy untouched, while a reload failure leaves the new policy on disk
//! with the resolver still serving the old one. The second state is a
//! documented inconsistency; the next successful cycle converges it.

use std::path::Path;

use thiserror::Error;

use sinkhound_fs::{Filesystem, FsError};
use sinkhound_stats::classify::Thresholds;
use sinkhound_stats::zone::{count_suspicious, render_zone};
use sinkhound_stats::StatsStore;

use crate::reload::{ReloadError, Reloader};

/// Errors from the publish step.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to write policy file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: FsError,
    },

    #[error("resolver reload failed: {0}")]
    Reload(#[from] ReloadError),
}

/// What a successful publish did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishSummary {
    /// Domains currently tracked by the store.
    pub domains: usize,
    /// Domains written to the sinkhole zone.
    pub suspicious: usize,
}

/// Publishes the sinkhole zone file and triggers resolver reloads.
pub struct PolicyWriter<'a, F: Filesystem, R: Reloader> {
    fs: &'a F,
    reloader: &'a R,
    path: &'a Path,
}

impl<'a, F: Filesystem, R: Reloader> PolicyWriter<'a, F, R> {
    pub fn new(fs: &'a F, reloader: &'a R, path: &'a Path) -> Self {
        Self { fs, reloader, path }
    }

    /// Render, atomically replace, and reload.
    ///
    /// The zone text is written in full to a temp file next to the
    /// destination and renamed into place, so a concurrent reader of the
    /// policy path sees either the old file or the new one, never a
    /// partial write. The reload runs only after the rename succeeded; if
    /// it fails, the new file intentionally stays.
    pub fn publish(
        &self,
        store: &StatsStore,
        thresholds: &Thresholds,
    ) -> Result<PublishSummary, PublishError> {
        let zone = render_zone(store, thresholds);

        self.fs
            .write_atomic(self.path, zone.as_bytes())
            .map_err(|source| PublishError::Write {
                path: self.path.display().to_string(),
                source,
            })?;

        self.reloader.reload()?;

        Ok(PublishSummary {
            domains: store.len(),
            suspicious: count_suspicious(store, thresholds),
        })
    }
}
