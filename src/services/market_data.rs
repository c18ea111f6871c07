//! Market data provider interface

use crate::error::MarketDataError;
use crate::models::indicators::{Candle, Interval};
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Historical candles for a symbol, oldest first.
    ///
    /// `range` is a provider lookback such as `"6mo"` or `"1y"`.
    async fn get_candles(
        &self,
        symbol: &str,
        interval: Interval,
        range: &str,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Latest traded price for a symbol
    async fn get_latest_price(&self, symbol: &str) -> Result<f64, MarketDataError>;
}

/// Serves fixed candle sets from memory, keyed by symbol and interval.
///
/// Used for offline runs and tests; unknown keys answer with `NoData`.
#[derive(Debug, Default, Clone)]
pub struct StaticMarketDataProvider {
    candles: HashMap<(String, Interval), Vec<Candle>>,
    prices: HashMap<String, f64>,
}

impl StaticMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candles(mut self, symbol: &str, interval: Interval, candles: Vec<Candle>) -> Self {
        self.candles.insert((symbol.to_string(), interval), candles);
        self
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketDataProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        interval: Interval,
        _range: &str,
    ) -> Result<Vec<Candle>, MarketDataError> {
        self.candles
            .get(&(symbol.to_string(), interval))
            .cloned()
            .ok_or_else(|| MarketDataError::NoData(format!("{} ({})", symbol, interval)))
    }

    async fn get_latest_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        if let Some(&price) = self.prices.get(symbol) {
            return Ok(price);
        }
        self.candles
            .iter()
            .filter(|((s, _), _)| s == symbol)
            .min_by_key(|((_, interval), _)| interval.minutes())
            .and_then(|(_, candles)| candles.last())
            .map(|c| c.close)
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
    }
}
