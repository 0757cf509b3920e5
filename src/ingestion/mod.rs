//! # Data Ingestion Module
//!
//! ## Purpose
//! Handles ingestion of the postal code dataset: the record feed contract,
//! the CSV file feed, and the builder that drives a feed into the in-memory
//! index exactly once at startup.
//!
//! ## Input/Output Specification
//! - **Input**: a finite sequence of raw `(Zipcode, City, State)` tuples
//! - **Output**: the completed, immutable `ZipIndex`, or the feed's failure
//! - **Ordering**: feed order defines every insertion-order guarantee the
//!   index makes for same-zip and same-city records
//!
//! ## Architecture
//! - `RecordFeed` trait: common interface for record sources
//! - `csv.rs`: delimited-file feed (plain or gzip transport)
//! - `pipeline.rs`: the index builder and its build statistics
//!
//! A failed feed is fatal to the build phase: the error propagates to the
//! caller awaiting the build and no partial index is ever exposed.

pub mod csv;
pub mod pipeline;

use crate::errors::Result;
use async_trait::async_trait;
use serde::Deserialize;

pub use self::csv::CsvFeed;
pub use self::pipeline::{IndexBuilder, IngestStats};

/// Raw dataset tuple as produced by a feed, prior to normalization. Field
/// names follow the dataset's column headers.
#[derive(Debug, Clone, Deserialize)]
pub struct RawZipRecord {
    #[serde(rename = "Zipcode")]
    pub zipcode: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
}

/// A finite source of raw records, terminating with end-of-feed or an error.
#[async_trait]
pub trait RecordFeed {
    /// Short identifier used in logs and error context.
    fn name(&self) -> &str;

    /// Pull the next record; `Ok(None)` marks the end of the feed. A feed
    /// that has returned an error is exhausted and must not be polled again.
    async fn next_record(&mut self) -> Result<Option<RawZipRecord>>;
}
