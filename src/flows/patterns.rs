//! Positioning patterns across many flows

use super::is_index_ticker;
use crate::models::flow::{OptionFlow, OptionSide, RepeatFlow, UnusualVolume};
use std::collections::BTreeMap;

pub const MIN_PATTERN_FLOWS: usize = 3;
pub const MIN_PATTERN_PREMIUM: f64 = 300_000.0;
pub const MIN_SIDE_RATIO: f64 = 3.0;

pub const DEFAULT_MIN_SCORE: f64 = 12.0;
pub const DEFAULT_MAX_DAYS: i64 = 30;
pub const BEST_PLAYS_LIMIT: usize = 10;

/// Tickers where one side's premium is at least [`MIN_SIDE_RATIO`] times the
/// other's, over at least [`MIN_PATTERN_FLOWS`] flows and
/// [`MIN_PATTERN_PREMIUM`] total. Index products are excluded, as are tickers
/// that traded only one side. Largest total premium first.
pub fn identify_unusual_volume(flows: &[OptionFlow]) -> Vec<UnusualVolume> {
    let mut by_ticker: BTreeMap<&str, Vec<&OptionFlow>> = BTreeMap::new();
    for flow in flows.iter().filter(|f| !is_index_ticker(&f.ticker)) {
        by_ticker.entry(flow.ticker.as_str()).or_default().push(flow);
    }

    let mut patterns: Vec<UnusualVolume> = by_ticker
        .into_iter()
        .filter_map(|(ticker, group)| {
            let total_premium: f64 = group.iter().map(|f| f.premium).sum();
            if group.len() < MIN_PATTERN_FLOWS || total_premium < MIN_PATTERN_PREMIUM {
                return None;
            }

            let premium_of = |side: OptionSide| -> f64 {
                group.iter().filter(|f| f.side == side).map(|f| f.premium).sum()
            };
            let call = premium_of(OptionSide::Call);
            let put = premium_of(OptionSide::Put);
            if call.min(put) <= 0.0 {
                return None;
            }

            let ratio = call.max(put) / call.min(put);
            let direction = if call > put {
                OptionSide::Call
            } else {
                OptionSide::Put
            };
            (ratio >= MIN_SIDE_RATIO).then(|| UnusualVolume {
                ticker: ticker.to_string(),
                direction,
                ratio,
                total_premium,
                flow_count: group.len(),
            })
        })
        .collect();

    patterns.sort_by(|a, b| b.total_premium.total_cmp(&a.total_premium));
    patterns
}

/// Ticker and direction pairs with at least [`MIN_PATTERN_FLOWS`] flows,
/// highest average score first
pub fn detect_repeat_flows(flows: &[OptionFlow]) -> Vec<RepeatFlow> {
    let mut groups: BTreeMap<(&str, OptionSide), Vec<&OptionFlow>> = BTreeMap::new();
    for flow in flows {
        groups
            .entry((flow.ticker.as_str(), flow.side))
            .or_default()
            .push(flow);
    }

    let mut repeats: Vec<RepeatFlow> = groups
        .into_iter()
        .filter(|(_, group)| group.len() >= MIN_PATTERN_FLOWS)
        .map(|((ticker, direction), group)| {
            let count = group.len();
            RepeatFlow {
                ticker: ticker.to_string(),
                direction,
                flow_count: count,
                total_premium: group.iter().map(|f| f.premium).sum(),
                avg_score: group.iter().map(|f| f.score).sum::<f64>() / count as f64,
            }
        })
        .collect();

    repeats.sort_by(|a, b| b.avg_score.total_cmp(&a.avg_score));
    repeats
}

/// Up to [`BEST_PLAYS_LIMIT`] flows scoring at least `min_score`, expiring
/// within `max_days`, of 100+ contracts, whose direction agrees with RSI
/// (calls above 60, puts below 40). Highest score first.
pub fn best_plays(flows: &[OptionFlow], min_score: f64, max_days: i64) -> Vec<OptionFlow> {
    let mut plays: Vec<OptionFlow> = flows
        .iter()
        .filter(|f| {
            f.score >= min_score
                && f.days_to_expiration <= max_days
                && f.size >= 100
                && match (f.side, f.rsi) {
                    (OptionSide::Call, Some(rsi)) => rsi > 60.0,
                    (OptionSide::Put, Some(rsi)) => rsi < 40.0,
                    _ => false,
                }
        })
        .cloned()
        .collect();

    plays.sort_by(|a, b| b.score.total_cmp(&a.score));
    plays.truncate(BEST_PLAYS_LIMIT);
    plays
}
