//! Domain statistics and classification for sinkhound.
//!
//! This crate holds the pure core of the pipeline:
//! - the sensor's DNS event wire schema and rrname normalization
//! - per-domain behavioral aggregates (`StatsStore`)
//! - Shannon entropy of domain names
//! - the suspicion heuristic that turns aggregates into verdicts
//! - the never-flag whitelist
//! - rendering of verdicts into resolver sinkhole directives

pub mod classify;
pub mod entropy;
pub mod event;
pub mod store;
pub mod whitelist;
pub mod zone;

pub use classify::{is_suspicious, Thresholds};
pub use entropy::shannon_entropy;
pub use event::{DnsQuery, Normalizer, SensorEvent};
pub use store::{DomainStats, StatsStore};
pub use whitelist::{Whitelist, WhitelistError};
pub use zone::render_zone;
