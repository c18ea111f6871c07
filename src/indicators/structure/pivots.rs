//! Pivot point levels

use crate::models::indicators::{Candle, PivotLevels};
use chrono::Datelike;

/// Classic pivots from the high, low and close of the last bar
pub fn classic_pivots(candles: &[Candle]) -> Option<PivotLevels> {
    let last = candles.last()?;
    let (high, low, close) = (last.high, last.low, last.close);

    let pivot = (high + low + close) / 3.0;
    let range = high - low;

    Some(PivotLevels {
        pivot,
        r1: 2.0 * pivot - low,
        s1: 2.0 * pivot - high,
        r2: pivot + range,
        s2: pivot - range,
    })
}

/// Pivot over one calendar month: highest high, lowest low and last close of
/// the bars stamped inside that month (UTC).
pub fn monthly_pivot(candles: &[Candle], year: i32, month: u32) -> Option<f64> {
    let in_month: Vec<&Candle> = candles
        .iter()
        .filter(|c| c.timestamp.year() == year && c.timestamp.month() == month)
        .collect();

    let close = in_month.last()?.close;
    let high = in_month
        .iter()
        .map(|c| c.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let low = in_month.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

    Some((high + low + close) / 3.0)
}
