//! RSI (Relative Strength Index) indicator

use crate::models::indicators::{Candle, RsiIndicator};

pub const DEFAULT_RSI_PERIOD: u32 = 14;

/// Calculate RSI from simple averages of the last `period` close changes.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// A window with gains but no losses reads 100; a perfectly flat window has
/// no defined RSI and yields `None`.
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Option<RsiIndicator> {
    let period_len = period as usize;
    if period == 0 || candles.len() < period_len + 1 {
        return None;
    }

    let window = &candles[candles.len() - period_len - 1..];
    let (gain_sum, loss_sum) = window
        .windows(2)
        .map(|pair| pair[1].close - pair[0].close)
        .fold((0.0, 0.0), |(gain, loss), change| {
            if change > 0.0 {
                (gain + change, loss)
            } else {
                (gain, loss - change)
            }
        });

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    let value = match (avg_gain == 0.0, avg_loss == 0.0) {
        (true, true) => return None,
        (false, true) => 100.0,
        _ => 100.0 - (100.0 / (1.0 + avg_gain / avg_loss)),
    };

    Some(RsiIndicator { value, period })
}

/// Calculate RSI with the default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Option<RsiIndicator> {
    calculate_rsi(candles, DEFAULT_RSI_PERIOD)
}
