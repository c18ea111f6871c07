//! Options flow analysis
//!
//! Two inputs are understood: the exchange's per-series volume files, which
//! are summed per series, and trade-level flow exports, which are scored and
//! mined for lopsided or repeated positioning.

pub mod patterns;
pub mod scoring;
pub mod trades;
pub mod volume;

pub use patterns::*;
pub use scoring::*;
pub use trades::*;
pub use volume::*;

use chrono::{NaiveDate, NaiveDateTime};

/// Index products left out of per-ticker pattern detection
pub const INDEX_TICKERS: &[&str] = &["SPY", "QQQ", "SPX", "IWM"];

pub fn is_index_ticker(ticker: &str) -> bool {
    INDEX_TICKERS.contains(&ticker)
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Calendar date in any of the layouts the exports use
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
}

/// Number with currency symbols and thousands separators removed
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Non-negative whole count
pub(crate) fn parse_count(raw: &str) -> Option<u64> {
    parse_number(raw)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u64)
}
