//! Per-series option volume: loading and summarising

use super::{parse_count, parse_date, parse_number};
use crate::error::FlowError;
use crate::models::flow::{FlowSummary, OptionSide, VolumeRecord};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, warn};

/// Series traded fewer times than this are dropped on load
pub const MIN_SERIES_VOLUME: u64 = 100;

const REQUIRED_COLUMNS: &[&str] = &["Symbol", "Expiration", "Strike Price", "Call/Put", "Volume"];

#[derive(Debug, Deserialize)]
struct VolumeRow {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Expiration")]
    expiration: String,
    #[serde(rename = "Strike Price")]
    strike: String,
    #[serde(rename = "Call/Put")]
    side: String,
    #[serde(rename = "Last Price", default)]
    last_price: String,
    #[serde(rename = "Volume")]
    volume: String,
}

impl VolumeRow {
    fn into_record(self) -> Option<VolumeRecord> {
        Some(VolumeRecord {
            symbol: self.symbol.trim().to_uppercase(),
            expiration: parse_date(&self.expiration)?,
            strike: parse_number(&self.strike)?,
            side: self.side.parse::<OptionSide>().ok()?,
            last_price: parse_number(&self.last_price).unwrap_or(0.0),
            volume: parse_count(&self.volume)?,
        })
    }
}

/// Read a volume file, keeping series with at least [`MIN_SERIES_VOLUME`]
/// contracts that do not expire on `today`.
///
/// Rows that cannot be read are skipped with a warning; a file missing one
/// of the required columns is an error.
pub fn load_volume_csv<R: Read>(reader: R, today: NaiveDate) -> Result<Vec<VolumeRecord>, FlowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(FlowError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (line, row) in csv_reader.deserialize::<VolumeRow>().enumerate() {
        match row.map(VolumeRow::into_record) {
            Ok(Some(record)) => {
                if record.volume >= MIN_SERIES_VOLUME && record.expiration != today {
                    records.push(record);
                }
            }
            Ok(None) => {
                skipped += 1;
                debug!(line = line + 2, "Unreadable volume row");
            }
            Err(e) => {
                skipped += 1;
                debug!(line = line + 2, error = %e, "Malformed volume row");
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = records.len(), "Skipped unreadable volume rows");
    }
    Ok(records)
}

type SeriesKey = (NaiveDate, u64, OptionSide, u64);

/// Total volume per series of `symbol`, largest first.
///
/// A series is (expiration, strike, side, last price). `side` and
/// `expiration` narrow the input when given. Ties keep expiration then strike
/// order.
pub fn summarize_flows(
    records: &[VolumeRecord],
    symbol: &str,
    side: Option<OptionSide>,
    expiration: Option<NaiveDate>,
) -> Vec<FlowSummary> {
    let mut index: HashMap<SeriesKey, usize> = HashMap::new();
    let mut summaries: Vec<FlowSummary> = Vec::new();

    let selected = records.iter().filter(|r| {
        r.symbol == symbol
            && side.map_or(true, |s| r.side == s)
            && expiration.map_or(true, |e| r.expiration == e)
    });

    for record in selected {
        let key = (
            record.expiration,
            record.strike.to_bits(),
            record.side,
            record.last_price.to_bits(),
        );
        match index.get(&key) {
            Some(&i) => summaries[i].volume += record.volume,
            None => {
                index.insert(key, summaries.len());
                summaries.push(FlowSummary {
                    symbol: record.symbol.clone(),
                    expiration: record.expiration,
                    strike: record.strike,
                    side: record.side,
                    last_price: record.last_price,
                    volume: record.volume,
                });
            }
        }
    }

    summaries.sort_by(|a, b| {
        b.volume
            .cmp(&a.volume)
            .then(a.expiration.cmp(&b.expiration))
            .then(a.strike.total_cmp(&b.strike))
    });
    summaries
}

/// Distinct symbols present, sorted
pub fn volume_symbols(records: &[VolumeRecord]) -> Vec<String> {
    let mut symbols: Vec<String> = records.iter().map(|r| r.symbol.clone()).collect();
    symbols.sort();
    symbols.dedup();
    symbols
}
