//! Sinkhole zone rendering.
//!
//! Verdicts become resolver configuration: two directive lines per
//! suspicious domain, redirecting resolution to the loopback address.
//! Ordering follows the store's first-observation order so the published
//! file is stable between cycles.

use crate::classify::{is_suspicious, Thresholds};
use crate::store::StatsStore;

/// Sinkhole target address for flagged domains.
pub const SINKHOLE_ADDR: &str = "127.0.0.1";

/// Render the full sinkhole zone for every suspicious domain in the store.
///
/// Each flagged domain contributes exactly:
///
/// ```text
/// local-zone: "<domain>." redirect
/// local-data: "<domain>. A 127.0.0.1"
/// ```
pub fn render_zone(store: &StatsStore, thresholds: &Thresholds) -> String {
    let mut zone = String::new();
    for (domain, stats) in store.iter() {
        if is_suspicious(stats, thresholds) {
            zone.push_str(&format!("local-zone: \"{domain}.\" redirect\n"));
            zone.push_str(&format!("local-data: \"{domain}. A {SINKHOLE_ADDR}\"\n"));
        }
    }
    zone
}

/// Count the suspicious domains without rendering, for status output.
pub fn count_suspicious(store: &StatsStore, thresholds: &Thresholds) -> usize {
    store
        .iter()
        .filter(|(_, stats)| is_suspicious(stats, thresholds))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, u64, &[u32])]) -> StatsStore {
        let mut store = StatsStore::new();
        for &(domain, count, ttls) in entries {
            for _ in 0..count {
                store.record(domain, &[]);
            }
            if !ttls.is_empty() {
                // Attach the TTLs on one extra observation
                store.record(domain, ttls);
            }
        }
        store
    }

    #[test]
    fn test_empty_store_renders_empty_zone() {
        let store = StatsStore::new();
        assert_eq!(render_zone(&store, &Thresholds::default()), "");
    }

    #[test]
    fn test_benign_domains_render_nothing() {
        // Low entropy, healthy TTLs
        let store = store_with(&[("mail.example.com", 10, &[3600])]);
        assert_eq!(render_zone(&store, &Thresholds::default()), "");
    }

    #[test]
    fn test_suspicious_domain_renders_directive_pair() {
        // No TTLs ever observed: suspicious on count alone
        let store = store_with(&[("xq9z7vv1.example", 6, &[])]);
        let zone = render_zone(&store, &Thresholds::default());

        assert_eq!(
            zone,
            "local-zone: \"xq9z7vv1.example.\" redirect\n\
             local-data: \"xq9z7vv1.example. A 127.0.0.1\"\n"
        );
    }

    #[test]
    fn test_zone_preserves_first_observation_order() {
        let mut store = StatsStore::new();
        for _ in 0..6 {
            store.record("zzz-flux.example", &[10]);
        }
        for _ in 0..6 {
            store.record("aaa-flux.example", &[10]);
        }

        let zone = render_zone(&store, &Thresholds::default());
        let zzz = zone.find("zzz-flux.example").expect("zzz present");
        let aaa = zone.find("aaa-flux.example").expect("aaa present");
        assert!(zzz < aaa);
    }

    #[test]
    fn test_count_suspicious() {
        let mut store = StatsStore::new();
        for _ in 0..6 {
            store.record("flagged.example", &[10]);
        }
        store.record("benign.example", &[3600]);

        let t = Thresholds::default();
        assert_eq!(count_suspicious(&store, &t), 1);
    }

    #[test]
    fn test_mixed_store_renders_only_suspicious() {
        let mut store = StatsStore::new();
        for _ in 0..6 {
            store.record("bad.example", &[10]);
        }
        for _ in 0..3 {
            store.record("quiet.example", &[10]);
        }

        let zone = render_zone(&store, &Thresholds::default());
        assert!(zone.contains("bad.example"));
        assert!(!zone.contains("quiet.example"));
    }
}
