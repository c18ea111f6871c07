use super::indicators::Interval;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Oscillator state at one bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalState {
    Buy,
    Sell,
    Neutral,
}

impl SignalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalState::Buy => "Buy",
            SignalState::Sell => "Sell",
            SignalState::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Buy" | "B" => Ok(SignalState::Buy),
            "Sell" | "S" => Ok(SignalState::Sell),
            "Neutral" | "N" => Ok(SignalState::Neutral),
            other => Err(format!("unknown signal state '{}'", other)),
        }
    }
}

/// What a scan reports for one symbol and timeframe.
///
/// `NoData` and `InsufficientHistory` are sentinels: they are never treated as
/// `Neutral` and are excluded from transition detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalReading {
    Buy,
    Sell,
    Neutral,
    #[serde(rename = "Insufficient")]
    InsufficientHistory,
    #[serde(rename = "No Data")]
    NoData,
}

impl SignalReading {
    pub fn state(&self) -> Option<SignalState> {
        match self {
            SignalReading::Buy => Some(SignalState::Buy),
            SignalReading::Sell => Some(SignalState::Sell),
            SignalReading::Neutral => Some(SignalState::Neutral),
            SignalReading::InsufficientHistory | SignalReading::NoData => None,
        }
    }

    /// Ordering weight used when ranking scan rows
    pub fn priority(&self) -> u8 {
        match self {
            SignalReading::Buy => 3,
            SignalReading::Neutral => 2,
            SignalReading::Sell => 1,
            SignalReading::InsufficientHistory | SignalReading::NoData => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalReading::Buy => "Buy",
            SignalReading::Sell => "Sell",
            SignalReading::Neutral => "Neutral",
            SignalReading::InsufficientHistory => "Insufficient",
            SignalReading::NoData => "No Data",
        }
    }
}

impl From<SignalState> for SignalReading {
    fn from(state: SignalState) -> Self {
        match state {
            SignalState::Buy => SignalReading::Buy,
            SignalState::Sell => SignalReading::Sell,
            SignalState::Neutral => SignalReading::Neutral,
        }
    }
}

impl fmt::Display for SignalReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Oscillator values at one bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorPoint {
    pub timestamp: DateTime<Utc>,
    pub raw: f64,
    pub ema_fast: f64,
    pub ema_main: f64,
    pub ema_signal: f64,
    pub state: SignalState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeframeReading {
    pub interval: Interval,
    pub reading: SignalReading,
}

/// One row of a multi-timeframe scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolReport {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub readings: Vec<TimeframeReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_21: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_200: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_pivot: Option<f64>,
}

impl SymbolReport {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: None,
            readings: Vec::new(),
            ema_21: None,
            ema_50: None,
            ema_200: None,
            monthly_pivot: None,
        }
    }

    pub fn reading(&self, interval: Interval) -> Option<SignalReading> {
        self.readings
            .iter()
            .find(|r| r.interval == interval)
            .map(|r| r.reading)
    }
}

/// A ticker whose state differs from the last persisted one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalChange {
    pub symbol: String,
    pub previous: SignalState,
    pub current: SignalState,
}

impl fmt::Display for SignalChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signal change for {}: {} -> {}",
            self.symbol, self.previous, self.current
        )
    }
}
