//! Unit tests for RSI indicator

use crate::fixtures::trending_candles;
use signaldesk::indicators::momentum::{calculate_rsi, calculate_rsi_default};

#[test]
fn test_rsi_insufficient_data() {
    let candles = trending_candles(&[1.0, 2.0, 3.0]);
    assert!(calculate_rsi(&candles, 14).is_none());
    assert!(calculate_rsi(&candles, 0).is_none());
}

#[test]
fn test_rsi_all_gains() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    let rsi = calculate_rsi_default(&trending_candles(&closes)).unwrap();
    assert_eq!(rsi.value, 100.0);
    assert_eq!(rsi.period, 14);
}

#[test]
fn test_rsi_flat_window_is_undefined() {
    let candles = trending_candles(&[50.0; 20]);
    assert!(calculate_rsi_default(&candles).is_none());
}

#[test]
fn test_rsi_balanced_moves() {
    // +2, -1, +2, -1: avg gain 1.0, avg loss 0.5 over 4 changes
    let candles = trending_candles(&[10.0, 12.0, 11.0, 13.0, 12.0]);
    let rsi = calculate_rsi(&candles, 4).unwrap();
    let expected = 100.0 - 100.0 / (1.0 + 2.0);
    assert!((rsi.value - expected).abs() < 1e-9);
}

#[test]
fn test_rsi_uses_only_last_window() {
    let mut closes = vec![100.0, 50.0, 25.0];
    closes.extend([26.0, 27.0, 28.0]);
    let rsi = calculate_rsi(&trending_candles(&closes), 3).unwrap();
    assert_eq!(rsi.value, 100.0);
}
