//! Wire schema for the sensor's DNS telemetry events.
//!
//! The sensor emits one JSON object per line. Only events with
//! `event_type == "dns"` and `dns.type == "query"` matter to the pipeline;
//! everything else (flows, alerts, TLS events) is filtered out here.
//! Parsing is permissive: unknown fields are ignored and the fields we do
//! care about are all optional, so a schema mismatch shows up as a filtered
//! event rather than a parse error.

use regex::Regex;
use serde::Deserialize;

/// One line of sensor telemetry.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorEvent {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub dns: Option<DnsQuery>,
}

/// The `dns` object of a telemetry event.
#[derive(Debug, Clone, Deserialize)]
pub struct DnsQuery {
    #[serde(rename = "type", default)]
    pub query_type: Option<String>,
    #[serde(default)]
    pub rrname: Option<String>,
    /// Answer section, when the sensor logged one. Entries are kept as raw
    /// JSON values because the sensor emits heterogeneous answer records;
    /// malformed entries are ignored at extraction time.
    #[serde(default)]
    pub answers: Option<Vec<serde_json::Value>>,
}

impl SensorEvent {
    /// Parse one telemetry line.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Returns the DNS query payload if this event is a DNS query event.
    pub fn as_dns_query(&self) -> Option<&DnsQuery> {
        if self.event_type.as_deref() != Some("dns") {
            return None;
        }
        let dns = self.dns.as_ref()?;
        if dns.query_type.as_deref() != Some("query") {
            return None;
        }
        Some(dns)
    }
}

impl DnsQuery {
    /// Extract every present `ttl` field from well-formed answer objects.
    /// Non-object entries and answers without a ttl are silently ignored.
    pub fn answer_ttls(&self) -> Vec<u32> {
        let Some(answers) = &self.answers else {
            return Vec::new();
        };
        answers
            .iter()
            .filter_map(|a| a.as_object())
            .filter_map(|a| a.get("ttl"))
            .filter_map(|t| t.as_u64())
            .filter_map(|t| u32::try_from(t).ok())
            .collect()
    }
}

/// Normalizes and validates queried domain names.
///
/// A name is canonical once its trailing dot is stripped and it is
/// lowercased. Names with characters outside `[a-z0-9.-]` (punycode stays,
/// underscores and injected garbage do not) are rejected.
#[derive(Debug)]
pub struct Normalizer {
    valid: Regex,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            valid: Regex::new(r"^[a-z0-9.-]+$").expect("valid regex pattern"),
        }
    }

    /// Canonicalize a queried name; `None` if the name fails validation.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let stripped = raw.strip_suffix('.').unwrap_or(raw);
        let lowered = stripped.to_lowercase();
        if self.valid.is_match(&lowered) {
            Some(lowered)
        } else {
            None
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
