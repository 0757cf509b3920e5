//! # City Prefix Trie Module
//!
//! ## Purpose
//! Implements the state-scoped prefix tree over city names and the bounded
//! traversal that produces deterministic, capped search results.
//!
//! ## Input/Output Specification
//! - **Input**: normalized records at build time; lower-cased prefixes,
//!   optional state keys, and a result cap at query time
//! - **Output**: city-group match payloads in pre-order, capped globally
//! - **Performance**: descent is O(prefix length); collection is
//!   proportional to the number of payloads emitted, not dataset size
//!
//! ## Key Features
//! - One independently-rooted trie per lower-cased state key
//! - One edge per lower-case character of the city name
//! - Match payloads only at full-city-name nodes, shared by every record
//!   with that name in that state
//! - Early-terminating pre-order traversal with a cap shared across states

use crate::normalize::region_key;
use crate::ZipRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One complete city name within a state: the original-case name plus every
/// record sharing it, in ingestion order.
#[derive(Debug, Clone, Serialize)]
pub struct MatchPayload {
    /// City name as stored (title case)
    pub name: String,
    /// Records whose city traces the path to this node
    pub records: Vec<Arc<ZipRecord>>,
}

/// Trie node: child edges keyed by one lower-case character, plus an
/// optional payload at nodes that terminate a full city name.
///
/// `BTreeMap` children make in-order iteration the ascending character
/// order the traversal contract requires, with no sort step.
#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    payload: Option<MatchPayload>,
}

impl TrieNode {
    /// Walks the trie along `path`, creating nodes as needed, and returns
    /// the terminal node. An empty path returns `self` — an empty city name
    /// keeps its payload on the region root.
    fn walk_mut(&mut self, path: &str) -> &mut TrieNode {
        let mut node = self;
        for c in path.chars() {
            node = node.children.entry(c).or_default();
        }
        node
    }

    /// Follows `path` without creating nodes; `None` if any edge is missing.
    fn descend(&self, path: &str) -> Option<&TrieNode> {
        let mut node = self;
        for c in path.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }

    /// Pre-order payload collection: this node's payload before its
    /// children's, children in ascending character order.
    ///
    /// Returns `false` the moment `out` reaches `max_matches`; the caller
    /// must not resume traversal anywhere after that — subtrees and later
    /// region roots are skipped entirely, not merely left uncounted.
    fn collect_into(&self, out: &mut Vec<MatchPayload>, max_matches: usize) -> bool {
        if let Some(payload) = &self.payload {
            out.push(payload.clone());
            if out.len() >= max_matches {
                return false;
            }
        }
        for child in self.children.values() {
            if !child.collect_into(out, max_matches) {
                return false;
            }
        }
        true
    }
}

/// City-name prefix index partitioned by state.
///
/// Each lower-cased state key owns an independent trie; distinct states
/// never share nodes. The `BTreeMap` of roots yields states in ascending
/// key order for unscoped searches and for key listings.
#[derive(Debug, Default)]
pub struct PrefixIndex {
    regions: BTreeMap<String, TrieNode>,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its state's trie, extending the trie along the
    /// lower-cased city name and appending the record to the payload at the
    /// terminal node (created on first use, keyed by the stored city name).
    pub fn insert(&mut self, record: Arc<ZipRecord>) {
        let root = self.regions.entry(region_key(&record.state)).or_default();
        let node = root.walk_mut(&record.city.to_lowercase());
        node.payload
            .get_or_insert_with(|| MatchPayload {
                name: record.city.clone(),
                records: Vec::new(),
            })
            .records
            .push(record);
    }

    /// Prefix search over one state's trie or, when `region` is `None`,
    /// every known state in ascending key order.
    ///
    /// The cap is global: once `max_matches` payloads have been collected,
    /// no further subtree or state trie is entered. Unknown states, missing
    /// prefix paths, and an empty index all yield an empty list.
    pub fn search(
        &self,
        name_prefix: &str,
        region: Option<&str>,
        max_matches: usize,
    ) -> Vec<MatchPayload> {
        let mut out = Vec::new();
        if max_matches == 0 {
            return out;
        }

        let prefix = name_prefix.to_lowercase();
        match region {
            Some(state) => {
                if let Some(root) = self.regions.get(&region_key(state)) {
                    search_root(root, &prefix, &mut out, max_matches);
                }
            }
            None => {
                for root in self.regions.values() {
                    if !search_root(root, &prefix, &mut out, max_matches) {
                        break;
                    }
                }
            }
        }

        out
    }

    /// All state keys with at least one record, ascending, rendered in
    /// upper case for presentation.
    pub fn region_keys(&self) -> Vec<String> {
        self.regions.keys().map(|k| k.to_uppercase()).collect()
    }

    /// Number of distinct states seen so far.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

/// Descend one state's trie along `prefix` and collect from the node
/// reached. A missing edge skips the state (no match, not an error).
/// Returns `false` once the shared cap is exhausted.
fn search_root(
    root: &TrieNode,
    prefix: &str,
    out: &mut Vec<MatchPayload>,
    max_matches: usize,
) -> bool {
    match root.descend(prefix) {
        Some(node) => node.collect_into(out, max_matches),
        None => true,
    }
}
