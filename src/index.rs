//! # Aggregate Zip Index
//!
//! Owns the exact-match table and the state-scoped prefix tries, and exposes
//! the three query operations the request layer maps onto. Built once by the
//! ingestion pipeline; after the build completes the index is never mutated,
//! so any number of concurrent readers may query it without locking.

use crate::trie::{MatchPayload, PrefixIndex};
use crate::ZipRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory index over the full dataset.
#[derive(Debug, Default)]
pub struct ZipIndex {
    /// Exact-match table: zip code to records in ingestion order
    by_zip: HashMap<String, Vec<Arc<ZipRecord>>>,
    /// Per-state prefix tries over city names
    by_city: PrefixIndex,
    record_count: usize,
}

/// Summary counters for the health endpoint and build logging.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub records: usize,
    pub distinct_zips: usize,
    pub states: usize,
}

impl ZipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one normalized record into both indexes. Called only by the
    /// builder during the single sequential build phase; feed order defines
    /// every insertion-order guarantee the queries make.
    pub fn insert(&mut self, record: ZipRecord) {
        let record = Arc::new(record);
        self.by_zip
            .entry(record.zip.clone())
            .or_default()
            .push(Arc::clone(&record));
        self.by_city.insert(record);
        self.record_count += 1;
    }

    /// Every record stored under `zip`, in ingestion order. Unknown codes
    /// yield an empty slice, not an error.
    pub fn lookup_by_code(&self, zip: &str) -> &[Arc<ZipRecord>] {
        self.by_zip.get(zip).map(Vec::as_slice).unwrap_or(&[])
    }

    /// City groups whose name starts with `prefix`, optionally scoped to
    /// one state, capped at `max_matches` across all states scanned.
    pub fn search_by_city_prefix(
        &self,
        prefix: &str,
        state: Option<&str>,
        max_matches: usize,
    ) -> Vec<MatchPayload> {
        self.by_city.search(prefix, state, max_matches)
    }

    /// All states with at least one record, ascending, upper-cased.
    pub fn list_regions(&self) -> Vec<String> {
        self.by_city.region_keys()
    }

    /// Total number of ingested records.
    pub fn len(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            records: self.record_count,
            distinct_zips: self.by_zip.len(),
            states: self.by_city.region_count(),
        }
    }
}
