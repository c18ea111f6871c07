//! Flow scoring and technical context

use crate::indicators::momentum::calculate_rsi;
use crate::models::flow::{OptionFlow, OptionSide};
use crate::models::indicators::Interval;
use crate::services::market_data::MarketDataProvider;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Daily bars needed before RSI and the 5-day change are attached
pub const MIN_CONTEXT_BARS: usize = 14;
const CONTEXT_RSI_PERIOD: u32 = 14;
const CONTEXT_RANGE: &str = "1mo";

/// Points for how aggressively the trade hit the market
fn side_code_points(code: Option<&str>) -> f64 {
    match code {
        Some("AA") => 5.0,
        Some("BB") => 4.0,
        Some("A") => 2.0,
        Some("B") => 1.0,
        _ => 0.0,
    }
}

/// Conviction score of a single flow; never negative.
///
/// Sums a premium term scaled by the move needed per dollar paid, side code,
/// the unusual / golden sweep / opening flags, how far out of the money the
/// strike is, time to expiry, a small-size penalty and an RSI confirmation
/// point.
pub fn score_flow(flow: &OptionFlow) -> f64 {
    let mut score = 0.0;
    let move_pct = flow.move_pct();

    let reward = if flow.size == 0 {
        1.0
    } else if flow.premium > 0.0 {
        move_pct / (flow.premium / flow.size as f64)
    } else {
        0.0
    };
    score += (flow.premium / 50_000.0).min(5.0) * (reward / 10.0).min(2.0);

    score += side_code_points(flow.side_code.as_deref());

    if flow.is_unusual {
        score += 2.0;
    }
    if flow.is_golden_sweep {
        score += 3.0;
    }
    if flow.is_opening {
        score += 1.0;
    }

    score += if (5.0..=15.0).contains(&move_pct) {
        3.0
    } else if move_pct > 15.0 && move_pct <= 30.0 {
        2.0
    } else if move_pct <= 50.0 {
        1.0
    } else {
        0.0
    };

    score += match flow.days_to_expiration {
        d if d <= 7 => 2.0,
        d if d <= 30 => 1.5,
        d if d <= 60 => 0.5,
        _ => 0.0,
    };

    if flow.size < 100 {
        score -= 2.0;
    }

    match (flow.side, flow.rsi) {
        (OptionSide::Call, Some(rsi)) if rsi > 60.0 => score += 1.0,
        (OptionSide::Put, Some(rsi)) if rsi < 40.0 => score += 1.0,
        _ => {}
    }

    score.max(0.0)
}

/// Recompute every flow's score
pub fn score_flows(flows: &mut [OptionFlow]) {
    for flow in flows.iter_mut() {
        flow.score = score_flow(flow);
    }
}

/// Attach daily RSI(14) and the 5-day percent change of each ticker.
///
/// Tickers whose history cannot be fetched, or is shorter than
/// [`MIN_CONTEXT_BARS`], are left without context.
pub async fn add_technical_context(flows: &mut [OptionFlow], provider: &dyn MarketDataProvider) {
    let tickers: BTreeSet<String> = flows.iter().map(|f| f.ticker.clone()).collect();
    let mut context: HashMap<String, (Option<f64>, Option<f64>)> = HashMap::new();

    for ticker in tickers {
        let candles = match provider.get_candles(&ticker, Interval::Day1, CONTEXT_RANGE).await {
            Ok(candles) => candles,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "No technical context");
                continue;
            }
        };
        if candles.len() < MIN_CONTEXT_BARS {
            debug!(ticker = %ticker, bars = candles.len(), "Too few bars for context");
            continue;
        }

        let rsi = calculate_rsi(&candles, CONTEXT_RSI_PERIOD).map(|r| r.value);
        let last = candles[candles.len() - 1].close;
        let base = candles[candles.len() - 5].close;
        let change_5d = (base != 0.0).then(|| (last - base) / base * 100.0);
        context.insert(ticker, (rsi, change_5d));
    }

    for flow in flows.iter_mut() {
        if let Some(&(rsi, change_5d)) = context.get(&flow.ticker) {
            flow.rsi = rsi;
            flow.change_5d = change_5d;
        }
    }
}

/// Technical context, then scores
pub async fn enrich_flows(flows: &mut [OptionFlow], provider: &dyn MarketDataProvider) {
    add_technical_context(flows, provider).await;
    score_flows(flows);
}
