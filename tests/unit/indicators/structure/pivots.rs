//! Unit tests for pivot levels

use chrono::{TimeZone, Utc};
use signaldesk::indicators::structure::{classic_pivots, monthly_pivot};
use signaldesk::models::indicators::Candle;

fn bar(year: i32, month: u32, day: u32, high: f64, low: f64, close: f64) -> Candle {
    let ts = Utc.with_ymd_and_hms(year, month, day, 20, 0, 0).unwrap();
    Candle::new(close, high, low, close, 0.0, ts)
}

#[test]
fn classic_pivots_from_last_bar() {
    let candles = vec![
        bar(2024, 3, 1, 50.0, 40.0, 45.0),
        bar(2024, 3, 4, 110.0, 90.0, 100.0),
    ];
    let levels = classic_pivots(&candles).unwrap();
    assert!((levels.pivot - 100.0).abs() < 1e-9);
    assert!((levels.r1 - 110.0).abs() < 1e-9);
    assert!((levels.s1 - 90.0).abs() < 1e-9);
    assert!((levels.r2 - 120.0).abs() < 1e-9);
    assert!((levels.s2 - 80.0).abs() < 1e-9);
}

#[test]
fn classic_pivots_empty() {
    assert!(classic_pivots(&[]).is_none());
}

#[test]
fn monthly_pivot_uses_only_that_month() {
    let candles = vec![
        bar(2024, 2, 28, 500.0, 1.0, 300.0),
        bar(2024, 3, 1, 12.0, 9.0, 10.0),
        bar(2024, 3, 15, 15.0, 8.0, 11.0),
        bar(2024, 3, 28, 13.0, 10.0, 12.0),
        bar(2024, 4, 1, 600.0, 2.0, 400.0),
    ];
    let pivot = monthly_pivot(&candles, 2024, 3).unwrap();
    assert!((pivot - (15.0 + 8.0 + 12.0) / 3.0).abs() < 1e-9);
    assert!(monthly_pivot(&candles, 2024, 5).is_none());
}
