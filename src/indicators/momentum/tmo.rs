//! TMO (True Momentum Oscillator)
//!
//! Each bar accumulates the sign of `close - open` against the opens of the
//! trailing `length` bars. That raw count is smoothed three times with
//! adjust-free EMAs: `fast = EMA(raw, calc_length)`,
//! `main = EMA(fast, smooth_length)`, `signal = EMA(main, smooth_length)`.
//! A bar is `Buy` when `main` crosses above `signal` on that bar and `Sell`
//! when it crosses below.

use crate::common::math;
use crate::models::indicators::Candle;
use crate::models::signal::{OscillatorPoint, SignalState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmoParams {
    /// Trailing window of opens compared against each close
    pub length: usize,
    /// Span of the first smoothing pass
    pub calc_length: usize,
    /// Span of the main and signal passes
    pub smooth_length: usize,
}

impl Default for TmoParams {
    fn default() -> Self {
        Self {
            length: 14,
            calc_length: 5,
            smooth_length: 3,
        }
    }
}

impl TmoParams {
    /// Fewest bars for which a state is reported
    pub fn min_bars(&self) -> usize {
        self.length + 2 * self.smooth_length
    }
}

/// Sign-accumulation series.
///
/// `raw[i] = sum(sign(close[i] - open[max(0, i - j)]) for j in 0..length)`;
/// windows that reach before the first bar reuse the first open.
pub fn raw_momentum(candles: &[Candle], length: usize) -> Vec<f64> {
    (0..candles.len())
        .map(|i| {
            let close = candles[i].close;
            (0..length)
                .map(|j| math::sign(close - candles[i.saturating_sub(j)].open))
                .sum()
        })
        .collect()
}

/// Crossover classification between two consecutive bars.
///
/// Comparisons are strict with no tolerance: a bar where `main` only touches
/// `signal` is not a cross, while leaving an exact tie counts.
pub fn crossover_state(prev_main: f64, prev_signal: f64, main: f64, signal: f64) -> SignalState {
    if main > signal && prev_main <= prev_signal {
        SignalState::Buy
    } else if main < signal && prev_main >= prev_signal {
        SignalState::Sell
    } else {
        SignalState::Neutral
    }
}

/// Full oscillator series, or `None` when there are fewer than
/// [`TmoParams::min_bars`] candles.
pub fn oscillator(candles: &[Candle], params: &TmoParams) -> Option<Vec<OscillatorPoint>> {
    if candles.is_empty() || candles.len() < params.min_bars() {
        return None;
    }

    let raw = raw_momentum(candles, params.length);
    let fast = math::ema_series(&raw, params.calc_length);
    let main = math::ema_series(&fast, params.smooth_length);
    let signal = math::ema_series(&main, params.smooth_length);

    let points = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let state = if i == 0 {
                SignalState::Neutral
            } else {
                crossover_state(main[i - 1], signal[i - 1], main[i], signal[i])
            };
            OscillatorPoint {
                timestamp: candle.timestamp,
                raw: raw[i],
                ema_fast: fast[i],
                ema_main: main[i],
                ema_signal: signal[i],
                state,
            }
        })
        .collect();

    Some(points)
}

/// State at the last bar, or `None` when history is too short
pub fn latest_state(candles: &[Candle], params: &TmoParams) -> Option<SignalState> {
    oscillator(candles, params)?.last().map(|p| p.state)
}
