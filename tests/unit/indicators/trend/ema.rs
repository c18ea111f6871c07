//! Unit tests for EMA indicator

use crate::fixtures::trending_candles;
use signaldesk::indicators::trend::{calculate_ema, calculate_emas, ema_series, DASHBOARD_EMA_PERIODS};

fn rising(count: usize) -> Vec<f64> {
    (0..count).map(|i| 100.0 + i as f64 * 0.1).collect()
}

#[test]
fn test_ema_insufficient_data() {
    let candles = trending_candles(&rising(10));
    assert!(calculate_ema(&candles, 20).is_none());
    assert!(calculate_ema(&candles, 0).is_none());
}

#[test]
fn test_ema_sufficient_data() {
    let candles = trending_candles(&rising(50));
    let ema = calculate_ema(&candles, 21).unwrap();
    assert_eq!(ema.period, 21);
    assert!(ema.value.is_finite());
    // lags a rising series
    assert!(ema.value < candles.last().unwrap().close);
}

#[test]
fn test_ema_series_starts_at_first_close() {
    let candles = trending_candles(&[5.0, 7.0]);
    let series = ema_series(&candles, 3);
    assert_eq!(series, vec![5.0, 6.0]);
}

#[test]
fn test_dashboard_emas() {
    let candles = trending_candles(&rising(250));
    let emas = calculate_emas(&candles, &DASHBOARD_EMA_PERIODS);
    assert_eq!(emas.len(), 3);
    assert_eq!(
        emas.iter().map(|e| e.period).collect::<Vec<_>>(),
        vec![21, 50, 200]
    );
}

#[test]
fn test_dashboard_emas_skip_long_periods_on_short_history() {
    let candles = trending_candles(&rising(60));
    let emas = calculate_emas(&candles, &DASHBOARD_EMA_PERIODS);
    assert_eq!(emas.len(), 2);
}
