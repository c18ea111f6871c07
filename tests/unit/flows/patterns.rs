//! Unit tests for unusual volume, repeat flows and best plays

use crate::fixtures::{option_flow, scored_flow};
use signaldesk::flows::{best_plays, detect_repeat_flows, identify_unusual_volume, BEST_PLAYS_LIMIT};
use signaldesk::models::flow::{OptionFlow, OptionSide};

use OptionSide::{Call, Put};

fn repeated(ticker: &str, side: OptionSide, premium: f64, times: usize) -> Vec<OptionFlow> {
    (0..times).map(|_| option_flow(ticker, side, premium)).collect()
}

#[test]
fn unusual_volume_needs_a_lopsided_two_sided_ticker() {
    let mut flows = Vec::new();
    // 600k calls vs 100k puts: 6:1
    flows.extend(repeated("AAPL", Call, 200_000.0, 3));
    flows.push(option_flow("AAPL", Put, 100_000.0));
    // 900k puts vs 100k calls: 9:1, larger total
    flows.extend(repeated("AMZN", Put, 300_000.0, 3));
    flows.push(option_flow("AMZN", Call, 100_000.0));
    // too few flows
    flows.extend(repeated("MSFT", Call, 500_000.0, 2));
    // index product
    flows.extend(repeated("SPY", Call, 500_000.0, 4));
    flows.push(option_flow("SPY", Put, 10_000.0));
    // balanced
    flows.extend(repeated("TSLA", Call, 200_000.0, 2));
    flows.extend(repeated("TSLA", Put, 150_000.0, 2));
    // one side only
    flows.extend(repeated("GOOG", Call, 200_000.0, 3));
    // below the premium floor
    flows.extend(repeated("PLTR", Call, 60_000.0, 4));
    flows.push(option_flow("PLTR", Put, 10_000.0));

    let patterns = identify_unusual_volume(&flows);
    let tickers: Vec<&str> = patterns.iter().map(|p| p.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["AMZN", "AAPL"]);

    assert_eq!(patterns[0].direction, Put);
    assert!((patterns[0].ratio - 9.0).abs() < 1e-9);
    assert_eq!(patterns[0].total_premium, 1_000_000.0);
    assert_eq!(patterns[0].flow_count, 4);
    assert_eq!(patterns[1].direction, Call);
    assert!((patterns[1].ratio - 6.0).abs() < 1e-9);
}

#[test]
fn repeat_flows_group_by_ticker_and_direction() {
    let flows = vec![
        scored_flow("AAPL", Call, 100_000.0, 10.0),
        scored_flow("AAPL", Call, 100_000.0, 12.0),
        scored_flow("AAPL", Call, 100_000.0, 14.0),
        scored_flow("AAPL", Put, 100_000.0, 30.0),
        scored_flow("MSFT", Put, 50_000.0, 20.0),
        scored_flow("MSFT", Put, 50_000.0, 20.0),
        scored_flow("MSFT", Put, 50_000.0, 20.0),
    ];

    let repeats = detect_repeat_flows(&flows);
    assert_eq!(repeats.len(), 2);
    assert_eq!(repeats[0].ticker, "MSFT");
    assert_eq!(repeats[0].direction, Put);
    assert_eq!(repeats[0].total_premium, 150_000.0);
    assert_eq!(repeats[1].ticker, "AAPL");
    assert_eq!(repeats[1].direction, Call);
    assert_eq!(repeats[1].flow_count, 3);
    assert!((repeats[1].avg_score - 12.0).abs() < 1e-9);
}

#[test]
fn best_plays_require_score_timing_size_and_rsi_agreement() {
    let with = |ticker: &str, side, score, rsi: Option<f64>, days| OptionFlow {
        rsi,
        days_to_expiration: days,
        ..scored_flow(ticker, side, 100_000.0, score)
    };

    let flows = vec![
        with("CALL_OK", Call, 15.0, Some(65.0), 10),
        with("CALL_FLAT_RSI", Call, 15.0, Some(50.0), 10),
        with("LOW_SCORE", Call, 11.0, Some(65.0), 10),
        with("PUT_FAR", Put, 13.0, Some(30.0), 40),
        with("PUT_OK", Put, 13.0, Some(30.0), 20),
        with("NO_RSI", Call, 20.0, None, 10),
        OptionFlow {
            size: 50,
            ..with("SMALL", Call, 18.0, Some(70.0), 10)
        },
    ];

    let plays = best_plays(&flows, 12.0, 30);
    let tickers: Vec<&str> = plays.iter().map(|p| p.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["CALL_OK", "PUT_OK"]);
}

#[test]
fn best_plays_are_capped() {
    let flows: Vec<OptionFlow> = (0..15)
        .map(|i| OptionFlow {
            rsi: Some(70.0),
            ..scored_flow(&format!("T{}", i), Call, 100_000.0, 12.0 + i as f64)
        })
        .collect();

    let plays = best_plays(&flows, 12.0, 30);
    assert_eq!(plays.len(), BEST_PLAYS_LIMIT);
    assert_eq!(plays[0].ticker, "T14");
}
