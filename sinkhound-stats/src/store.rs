//! Per-domain behavioral aggregates.
//!
//! The store is owned by the scheduler and passed by reference into the
//! ingest and publish stages; there is no global state. Entries are never
//! evicted: the store and its TTL lists grow for the life of the process.
//! That growth is a known property of the design, surfaced to operators
//! through the per-cycle status line rather than silently capped here.

use std::collections::HashMap;

use crate::entropy::shannon_entropy;

/// Behavioral aggregate for one domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainStats {
    /// Number of query observations, incremented once per matching event.
    pub count: u64,
    /// Every TTL value ever observed in answer sections, in arrival order.
    pub ttls: Vec<u32>,
    /// Shannon entropy of the domain string, recomputed on every update.
    pub entropy: f64,
}

/// Insertion-ordered map of canonical domain name to its aggregate.
///
/// Iteration follows first-observation order because the published zone
/// file preserves it; a plain `HashMap` alone would shuffle the output
/// between cycles.
#[derive(Debug, Default)]
pub struct StatsStore {
    stats: HashMap<String, DomainStats>,
    order: Vec<String>,
}

impl StatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one query observation for a canonical domain name.
    ///
    /// Creates the entry on first observation, increments the query count,
    /// appends any observed TTLs, and recomputes the name's entropy.
    pub fn record(&mut self, domain: &str, ttls: &[u32]) {
        use std::collections::hash_map::Entry;

        let stats = match self.stats.entry(domain.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                self.order.push(domain.to_string());
                e.insert(DomainStats::default())
            }
        };

        stats.count += 1;
        stats.ttls.extend_from_slice(ttls);
        stats.entropy = shannon_entropy(domain);
    }

    /// Look up the aggregate for a domain.
    pub fn get(&self, domain: &str) -> Option<&DomainStats> {
        self.stats.get(domain)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.stats.contains_key(domain)
    }

    /// Number of tracked domains.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate entries in first-observation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DomainStats)> {
        self.order.iter().map(|domain| {
            let stats = self
                .stats
                .get(domain)
                .expect("ordered key always present in map");
            (domain.as_str(), stats)
        })
    }
}
