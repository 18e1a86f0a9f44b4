//! The suspicion heuristic.
//!
//! A domain is suspicious when it has been queried more than
//! `count` times AND it either looks random (entropy above `entropy`)
//! or its answers carry fast-flux-grade TTLs (average below `ttl`).

use crate::store::DomainStats;

/// Classification thresholds. All three are runtime configuration; the
/// defaults reproduce the deployed heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Query count a domain must exceed before any verdict.
    pub count: u64,
    /// Entropy in bits above which a name counts as random-looking.
    pub entropy: f64,
    /// Average answer TTL in seconds below which a domain counts as
    /// fast-flux.
    pub ttl: f64,
}

pub const DEFAULT_COUNT_THRESHOLD: u64 = 5;
pub const DEFAULT_ENTROPY_THRESHOLD: f64 = 3.8;
pub const DEFAULT_TTL_THRESHOLD: f64 = 300.0;

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT_THRESHOLD,
            entropy: DEFAULT_ENTROPY_THRESHOLD,
            ttl: DEFAULT_TTL_THRESHOLD,
        }
    }
}

/// Mean of the observed TTLs; 0 when none were observed.
pub fn average_ttl(ttls: &[u32]) -> f64 {
    if ttls.is_empty() {
        return 0.0;
    }
    let sum: u64 = ttls.iter().map(|&t| u64::from(t)).sum();
    sum as f64 / ttls.len() as f64
}

/// Pure verdict for one domain's aggregate.
///
/// A domain with no recorded TTLs has an average TTL of 0, which always
/// satisfies the TTL branch; such a domain goes suspicious on query count
/// alone, independent of entropy. That asymmetry is intentional deployed
/// behavior and must not be altered without an explicit product decision.
pub fn is_suspicious(stats: &DomainStats, thresholds: &Thresholds) -> bool {
    let avg_ttl = average_ttl(&stats.ttls);
    stats.count > thresholds.count
        && (stats.entropy > thresholds.entropy || avg_ttl < thresholds.ttl)
}
