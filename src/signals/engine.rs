//! Momentum signal engine

use crate::error::MarketDataError;
use crate::indicators::momentum::tmo::{self, TmoParams};
use crate::models::indicators::Candle;
use crate::models::signal::{OscillatorPoint, SignalReading, SignalState};

pub struct SignalEngine;

impl SignalEngine {
    /// State at the last bar, or `None` ("no signal") when there are fewer
    /// than `length + 2 * smooth_length` candles
    pub fn evaluate(candles: &[Candle], params: &TmoParams) -> Option<SignalState> {
        tmo::latest_state(candles, params)
    }

    /// Oscillator values for every bar (for charts and debugging)
    pub fn oscillator(candles: &[Candle], params: &TmoParams) -> Option<Vec<OscillatorPoint>> {
        tmo::oscillator(candles, params)
    }

    /// Classify a fetch result.
    ///
    /// Provider failures and empty responses read as `NoData`, short history
    /// as `InsufficientHistory`; neither becomes `Neutral`.
    pub fn read(fetched: &Result<Vec<Candle>, MarketDataError>, params: &TmoParams) -> SignalReading {
        match fetched {
            Err(_) => SignalReading::NoData,
            Ok(candles) if candles.is_empty() => SignalReading::NoData,
            Ok(candles) => Self::evaluate(candles, params)
                .map(SignalReading::from)
                .unwrap_or(SignalReading::InsufficientHistory),
        }
    }
}
