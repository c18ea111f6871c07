//! Deduplicated alert rows

use crate::models::alert::{AlertRecord, DedupPolicy};
use chrono::NaiveDate;
use std::collections::BTreeMap;

type RowKey = (String, String, Option<NaiveDate>);

/// Alert rows collapsed according to a [`DedupPolicy`].
///
/// Under `LatestPerTicker` a ticker keeps a single row per keyword and a later
/// date replaces an earlier one. Under `DistinctPerDay` every distinct
/// (ticker, keyword, date) is its own row. Either way, merging a row that is
/// already present is a no-op.
#[derive(Debug, Clone, Default)]
pub struct AlertTable {
    policy: DedupPolicy,
    rows: BTreeMap<RowKey, AlertRecord>,
}

impl AlertTable {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            policy,
            rows: BTreeMap::new(),
        }
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    fn key(&self, record: &AlertRecord) -> RowKey {
        let date = match self.policy {
            DedupPolicy::LatestPerTicker => None,
            DedupPolicy::DistinctPerDay => Some(record.date),
        };
        (record.keyword.clone(), record.ticker.clone(), date)
    }

    /// Insert one record; returns true when the table changed
    pub fn insert(&mut self, record: AlertRecord) -> bool {
        let key = self.key(&record);
        match self.rows.get(&key) {
            Some(existing) if existing.date >= record.date => false,
            _ => {
                self.rows.insert(key, record);
                true
            }
        }
    }

    /// Merge records, returning the ones that were added or replaced a row
    pub fn merge<I>(&mut self, records: I) -> Vec<AlertRecord>
    where
        I: IntoIterator<Item = AlertRecord>,
    {
        let mut changed: Vec<AlertRecord> = Vec::new();
        for record in records {
            if self.insert(record.clone()) {
                changed.retain(|r| self.key(r) != self.key(&record));
                changed.push(record);
            }
        }
        sort_rows(&mut changed);
        changed
    }

    /// Rows ordered by date, then ticker
    pub fn rows(&self) -> Vec<AlertRecord> {
        let mut rows: Vec<AlertRecord> = self.rows.values().cloned().collect();
        sort_rows(&mut rows);
        rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn sort_rows(rows: &mut [AlertRecord]) {
    rows.sort_by(|a, b| {
        (a.date, &a.ticker, &a.keyword).cmp(&(b.date, &b.ticker, &b.keyword))
    });
}
