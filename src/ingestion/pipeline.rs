//! # Index Build Pipeline
//!
//! Drives a record feed through normalization into a fresh `ZipIndex`. The
//! build is strictly sequential — records are inserted one at a time in feed
//! order — and runs exactly once per process; the resulting index is handed
//! off immutable.

use crate::errors::Result;
use crate::index::ZipIndex;
use crate::ingestion::RecordFeed;
use crate::normalize::RecordNormalizer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;

/// Progress is logged every this many records.
const PROGRESS_INTERVAL: usize = 10_000;

/// Statistics for one completed build.
#[derive(Debug, Clone, Serialize)]
pub struct IngestStats {
    /// Records ingested
    pub records: usize,
    /// Distinct zip codes seen
    pub distinct_zips: usize,
    /// Distinct states seen
    pub states: usize,
    /// Build start time
    pub started_at: DateTime<Utc>,
    /// Build completion time
    pub finished_at: DateTime<Utc>,
    /// Wall time of the build
    pub elapsed_ms: u64,
}

/// Builds the in-memory index from a record feed.
pub struct IndexBuilder {
    normalizer: RecordNormalizer,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            normalizer: RecordNormalizer::new(),
        }
    }

    /// Consume the feed and resolve to the completed, immutable index.
    ///
    /// Any feed failure aborts the build and propagates here; the partially
    /// filled index is dropped, never returned. This future is the build's
    /// single-fire completion signal.
    pub async fn build<F>(&self, mut feed: F) -> Result<(ZipIndex, IngestStats)>
    where
        F: RecordFeed + Send,
    {
        tracing::info!(feed = feed.name(), "Starting index build");
        let started_at = Utc::now();
        let start = Instant::now();

        let mut index = ZipIndex::new();
        while let Some(raw) = feed.next_record().await? {
            index.insert(self.normalizer.normalize(raw));
            if index.len() % PROGRESS_INTERVAL == 0 {
                tracing::debug!(records = index.len(), "Ingestion progress");
            }
        }

        let counters = index.stats();
        let stats = IngestStats {
            records: counters.records,
            distinct_zips: counters.distinct_zips,
            states: counters.states,
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            records = stats.records,
            distinct_zips = stats.distinct_zips,
            states = stats.states,
            elapsed_ms = stats.elapsed_ms,
            "Index build complete"
        );

        Ok((index, stats))
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;
    use crate::ingestion::RawZipRecord;
    use async_trait::async_trait;

    /// In-memory feed: a fixed record list with an optional trailing error.
    struct StaticFeed {
        records: Vec<RawZipRecord>,
        fail_at_end: bool,
    }

    impl StaticFeed {
        fn new(rows: &[(&str, &str, &str)]) -> Self {
            let records = rows
                .iter()
                .map(|(zip, city, state)| RawZipRecord {
                    zipcode: zip.to_string(),
                    city: city.to_string(),
                    state: state.to_string(),
                })
                .collect();
            Self {
                records,
                fail_at_end: false,
            }
        }
    }

    #[async_trait]
    impl RecordFeed for StaticFeed {
        fn name(&self) -> &str {
            "static"
        }

        async fn next_record(&mut self) -> Result<Option<RawZipRecord>> {
            if !self.records.is_empty() {
                return Ok(Some(self.records.remove(0)));
            }
            if self.fail_at_end {
                return Err(SearchError::DataParsing {
                    feed: "static".to_string(),
                    details: "truncated row".to_string(),
                });
            }
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_build_normalizes_and_indexes() {
        let feed = StaticFeed::new(&[
            ("07405", "BUTLER", "NJ"),
            ("12345", "butler", "PA"),
            ("33333", "Buchanan", "GA"),
            ("33334", "BUCHANAN", "GA"),
        ]);

        let (index, stats) = IndexBuilder::new().build(feed).await.unwrap();

        assert_eq!(stats.records, 4);
        assert_eq!(stats.states, 3);
        assert_eq!(index.lookup_by_code("07405")[0].city, "Butler");

        // Case variants of the same city collapse into one group after
        // normalization.
        let matches = index.search_by_city_prefix("buch", Some("ga"), 10);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Buchanan");
        assert_eq!(matches[0].records.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_feed_builds_empty_index() {
        let feed = StaticFeed::new(&[]);
        let (index, stats) = IndexBuilder::new().build(feed).await.unwrap();
        assert!(index.is_empty());
        assert_eq!(stats.records, 0);
        assert!(index.list_regions().is_empty());
    }

    #[tokio::test]
    async fn test_feed_failure_aborts_build() {
        let mut feed = StaticFeed::new(&[("07405", "Butler", "NJ")]);
        feed.fail_at_end = true;

        let err = IndexBuilder::new().build(feed).await.unwrap_err();
        assert!(err.is_build_fatal());
    }
}
