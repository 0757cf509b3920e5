//! # Trie-Backed Zip Code Search
//!
//! ## Overview
//! This library implements a read-only lookup service over a static postal
//! code dataset: exact lookup by zip code, and prefix search over city names
//! scoped by state, with bounded, deterministic result counts.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `ingestion`: record feed contract, CSV feed, and the index builder
//! - `normalize`: canonicalization of raw dataset tuples (title-cased cities)
//! - `trie`: per-state prefix tree over city names with bounded traversal
//! - `index`: aggregate index combining the exact-match table and the tries
//! - `api`: REST endpoints mapping HTTP parameters onto index queries
//! - `config`: configuration management and settings
//! - `errors`: centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: delimited dataset rows (`Zipcode,City,State`), HTTP queries
//! - **Output**: JSON record lists and city-group matches
//! - **Lifecycle**: the index is built once at startup and is immutable
//!   afterwards; queries never mutate shared state and need no locking
//!
//! ## Usage
//! ```rust,no_run
//! use zip_trie_search::config::Config;
//! use zip_trie_search::ingestion::{CsvFeed, IndexBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.toml")?;
//!     let feed = CsvFeed::open(
//!         &config.ingestion.dataset_path,
//!         config.ingestion.delimiter,
//!     )?;
//!     let (index, _stats) = IndexBuilder::new().build(feed).await?;
//!     println!("{} records loaded", index.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod ingestion;
pub mod normalize;
pub mod trie;
pub mod index;
pub mod api;

// Re-exports for convenience
pub use config::Config;
pub use errors::{Result, SearchError};
pub use index::ZipIndex;
pub use trie::MatchPayload;

use ingestion::IngestStats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A single postal code entry from the source dataset.
///
/// Created once during ingestion and never mutated: the zip and state are
/// stored verbatim, the city is title-cased by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipRecord {
    /// Postal code; not required to be unique across the dataset
    pub zip: String,
    /// City name in title case
    pub city: String,
    /// State identifier as given in the dataset
    pub state: String,
}

impl fmt::Display for ZipRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} {}", self.city, self.state, self.zip)
    }
}

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub index: Arc<index::ZipIndex>,
    pub ingest: Arc<IngestStats>,
}
