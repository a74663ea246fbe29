//! Single-entry memo for the cleaned table, keyed by upload fingerprint.

use crate::types::CleanedTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Hit/miss counters, mainly for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: String,
    table: Arc<CleanedTable>,
}

/// Holds the cleaned table of the most recent upload.
///
/// Storing a new fingerprint replaces the previous entry.
#[derive(Debug, Default)]
pub struct CleaningCache {
    entry: Option<CacheEntry>,
    stats: CacheStats,
}

impl CleaningCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cleaned table for `fingerprint`.
    pub fn get(&mut self, fingerprint: &str) -> Option<Arc<CleanedTable>> {
        match &self.entry {
            Some(entry) if entry.fingerprint == fingerprint => {
                self.stats.hits += 1;
                debug!("Cleaning cache hit for {}", &fingerprint[..fingerprint.len().min(12)]);
                Some(Arc::clone(&entry.table))
            }
            _ => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, fingerprint: impl Into<String>, table: Arc<CleanedTable>) {
        self.entry = Some(CacheEntry {
            fingerprint: fingerprint.into(),
            table,
        });
    }

    /// Drop the cached table.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("Cleaning cache invalidated");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
