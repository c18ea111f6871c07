use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One ticker announced by an alert email
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlertRecord {
    pub ticker: String,
    pub date: NaiveDate,
    pub keyword: String,
}

impl AlertRecord {
    pub fn new(ticker: impl Into<String>, date: NaiveDate, keyword: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            date,
            keyword: keyword.into(),
        }
    }
}

/// A message as handed over by the mail source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Stable identifier assigned by the mail source (IMAP UID)
    pub id: String,
    /// Full RFC 822 message
    pub raw: Vec<u8>,
}

impl RawMessage {
    pub fn new(id: impl Into<String>, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            raw: raw.into(),
        }
    }
}

/// How repeated tickers in an alert table are collapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// One row per ticker, carrying the most recent alert date
    #[default]
    LatestPerTicker,
    /// One row per distinct (ticker, keyword, date)
    DistinctPerDay,
}

impl FromStr for DedupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" | "latest_per_ticker" => Ok(DedupPolicy::LatestPerTicker),
            "distinct" | "distinct_per_day" => Ok(DedupPolicy::DistinctPerDay),
            other => Err(format!("unknown dedup policy '{}'", other)),
        }
    }
}
