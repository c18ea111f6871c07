//! Relative strength of a symbol against a benchmark (e.g. a sector ETF vs SPY)

use crate::common::math;
use crate::models::indicators::{Candle, RelativeStrength, StrengthStatus};
use std::collections::HashMap;

pub const DEFAULT_RS_LOOKBACK: usize = 20;

/// Outperformance of `symbol` over `benchmark` across the last `lookback` bars.
///
/// Bars are aligned on shared timestamps first. When fewer than `lookback + 1`
/// common bars exist the whole common window is used instead. Returns `None`
/// with fewer than two common bars or a benchmark that did not move.
pub fn relative_strength(
    symbol: &[Candle],
    benchmark: &[Candle],
    lookback: usize,
) -> Option<RelativeStrength> {
    let bench_by_time: HashMap<i64, f64> = benchmark
        .iter()
        .map(|c| (c.timestamp.timestamp(), c.close))
        .collect();

    let (sym_closes, bench_closes): (Vec<f64>, Vec<f64>) = symbol
        .iter()
        .filter_map(|c| {
            bench_by_time
                .get(&c.timestamp.timestamp())
                .map(|&b| (c.close, b))
        })
        .unzip();

    if sym_closes.len() < 2 {
        return None;
    }

    let periods = lookback.clamp(1, sym_closes.len() - 1);
    let sym_change = math::pct_change(&sym_closes, periods)?;
    let bench_change = math::pct_change(&bench_closes, periods)?;
    if bench_change == 0.0 {
        return None;
    }

    let value = ((1.0 + sym_change) / (1.0 + bench_change) - 1.0) * 100.0;
    let status = if value > 0.0 {
        StrengthStatus::Strong
    } else {
        StrengthStatus::Weak
    };

    Some(RelativeStrength {
        value,
        status,
        lookback: periods,
    })
}
