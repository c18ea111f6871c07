//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::indicators::{Candle, EmaIndicator};

/// Periods shown next to the momentum signal on the ETF dashboard
pub const DASHBOARD_EMA_PERIODS: [u32; 3] = [21, 50, 200];

/// EMA of closes at every bar
pub fn ema_series(candles: &[Candle], period: u32) -> Vec<f64> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::ema_series(&closes, period as usize)
}

/// Calculate EMA for a specific period.
///
/// The recursion is seeded with the first close, so a value exists from the
/// first bar on; fewer bars than `period` still yields `None` because the
/// result would be dominated by the seed.
pub fn calculate_ema(candles: &[Candle], period: u32) -> Option<EmaIndicator> {
    if period == 0 || candles.len() < period as usize {
        return None;
    }

    let value = *ema_series(candles, period).last()?;

    Some(EmaIndicator { value, period })
}

/// Calculate multiple EMAs at once
pub fn calculate_emas(candles: &[Candle], periods: &[u32]) -> Vec<EmaIndicator> {
    periods
        .iter()
        .filter_map(|&period| calculate_ema(candles, period))
        .collect()
}
