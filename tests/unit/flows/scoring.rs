//! Unit tests for flow scoring

use crate::fixtures::{option_flow, trending_candles};
use signaldesk::flows::{enrich_flows, score_flow};
use signaldesk::models::flow::{OptionFlow, OptionSide};
use signaldesk::models::indicators::Interval;
use signaldesk::services::StaticMarketDataProvider;

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn aggressive_unusual_call_with_rsi_confirmation() {
    let flow = OptionFlow {
        days_to_expiration: 5,
        is_unusual: true,
        rsi: Some(65.0),
        ..option_flow("NVDA", OptionSide::Call, 100_000.0)
    };
    // premium term 2 * (10% / $500 per contract / 10) = 0.004, then
    // AA 5, unusual 2, opening 1, 5-15% move 3, week expiry 2, RSI 1
    approx(score_flow(&flow), 14.004);
}

#[test]
fn small_far_flow_is_floored_at_zero() {
    let flow = OptionFlow {
        strike: 160.0,
        size: 10,
        premium: 0.0,
        side_code: None,
        is_opening: false,
        days_to_expiration: 90,
        ..option_flow("XYZ", OptionSide::Call, 0.0)
    };
    assert_eq!(score_flow(&flow), 0.0);
}

#[test]
fn near_the_money_still_earns_a_move_point() {
    let flow = OptionFlow {
        strike: 103.0,
        size: 100,
        side_code: Some("B".to_string()),
        days_to_expiration: 45,
        rsi: Some(50.0),
        ..option_flow("XYZ", OptionSide::Call, 50_000.0)
    };
    // 1 * (3% / $500 / 10) + B 1 + opening 1 + move 1 + 31-60 days 0.5
    approx(score_flow(&flow), 3.5006);
}

#[test]
fn rsi_point_follows_direction() {
    let put = OptionFlow {
        rsi: Some(30.0),
        ..option_flow("XYZ", OptionSide::Put, 100_000.0)
    };
    let put_overbought = OptionFlow {
        rsi: Some(70.0),
        ..put.clone()
    };
    approx(score_flow(&put) - score_flow(&put_overbought), 1.0);
}

#[tokio::test]
async fn enrich_attaches_context_then_scores() {
    let closes: Vec<f64> = (1..=20).map(|i| 100.0 + i as f64).collect();
    let provider =
        StaticMarketDataProvider::new().with_candles("NVDA", Interval::Day1, trending_candles(&closes));

    let mut flows = vec![
        option_flow("NVDA", OptionSide::Call, 100_000.0),
        option_flow("AMD", OptionSide::Call, 100_000.0),
    ];
    enrich_flows(&mut flows, &provider).await;

    assert_eq!(flows[0].rsi, Some(100.0));
    approx(flows[0].change_5d.unwrap(), 4.0 / 116.0 * 100.0);
    // AA 5, opening 1, move 3, 10 days 1.5, RSI 1, premium term 0.004
    approx(flows[0].score, 11.504);

    assert_eq!(flows[1].rsi, None);
    approx(flows[1].score, 10.504);
}
