//! Unit tests for numeric helpers

use signaldesk::common::math::{ema, ema_alpha, ema_series, pct_change, sign, sma};

#[test]
fn ema_alpha_matches_span() {
    assert!((ema_alpha(3) - 0.5).abs() < 1e-12);
    assert!((ema_alpha(5) - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn ema_series_is_adjust_free() {
    let out = ema_series(&[2.0, 4.0, 8.0], 3);
    assert_eq!(out[0], 2.0);
    assert!((out[1] - 3.0).abs() < 1e-12);
    assert!((out[2] - 5.5).abs() < 1e-12);
}

#[test]
fn ema_of_empty_series() {
    assert!(ema_series(&[], 5).is_empty());
    assert!(ema(&[], 5).is_none());
}

#[test]
fn sma_uses_last_window() {
    assert_eq!(sma(&[1.0, 2.0, 3.0, 4.0], 2), Some(3.5));
    assert_eq!(sma(&[1.0], 2), None);
    assert_eq!(sma(&[1.0], 0), None);
}

#[test]
fn sign_is_ternary() {
    assert_eq!(sign(3.2), 1.0);
    assert_eq!(sign(-0.1), -1.0);
    assert_eq!(sign(0.0), 0.0);
    assert_eq!(sign(f64::NAN), 0.0);
}

#[test]
fn pct_change_over_periods() {
    let change = pct_change(&[100.0, 105.0, 110.0], 2).unwrap();
    assert!((change - 0.10).abs() < 1e-12);
    assert!(pct_change(&[100.0], 1).is_none());
    assert!(pct_change(&[0.0, 1.0], 1).is_none());
}
