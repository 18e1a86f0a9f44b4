//! Never-flag whitelist.
//!
//! Whitelisted domains are dropped at ingest time: they never get a store
//! entry, so they can never appear in the published zone regardless of
//! query volume.

use std::collections::HashSet;

use thiserror::Error;

use crate::event::Normalizer;

/// Errors from whitelist construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WhitelistError {
    #[error("invalid domain name: {0}")]
    InvalidDomain(String),
}

/// Set of canonical domain names exempt from classification.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    domains: HashSet<String>,
}

impl Whitelist {
    /// An empty whitelist (nothing exempt).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in defaults: a handful of high-volume infrastructure
    /// domains that would otherwise dominate the store.
    pub fn defaults() -> Self {
        let mut wl = Self::empty();
        for domain in ["google.com", "facebook.com", "microsoft.com"] {
            wl.add(domain).expect("default whitelist entries are valid");
        }
        wl
    }

    /// Add a domain, normalizing it to canonical form first.
    pub fn add(&mut self, raw: &str) -> Result<(), WhitelistError> {
        let normalizer = Normalizer::new();
        let domain = normalizer
            .normalize(raw)
            .ok_or_else(|| WhitelistError::InvalidDomain(raw.to_string()))?;
        self.domains.insert(domain);
        Ok(())
    }

    /// Membership test against a canonical domain name.
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
