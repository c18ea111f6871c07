//! Caller-owned record of already processed messages

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Message ids already folded into each keyword's table.
///
/// The extractor takes the cursor by value and hands back the updated one, so
/// the caller decides how long it lives and whether it is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedCursor {
    seen: BTreeMap<String, BTreeSet<String>>,
}

impl ProcessedCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, keyword: &str, id: &str) -> bool {
        self.seen
            .get(keyword)
            .map(|ids| ids.contains(id))
            .unwrap_or(false)
    }

    /// Record `id` under `keyword`; returns false if it was already there
    pub fn mark(&mut self, keyword: &str, id: &str) -> bool {
        self.seen
            .entry(keyword.to_string())
            .or_default()
            .insert(id.to_string())
    }

    pub fn processed_count(&self, keyword: &str) -> usize {
        self.seen.get(keyword).map(BTreeSet::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.seen.values().all(BTreeSet::is_empty)
    }
}
