use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One traded interval for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}

/// Bar interval, spelled the way the chart provider expects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minutes1,
    #[serde(rename = "2m")]
    Minutes2,
    #[serde(rename = "5m")]
    Minutes5,
    #[serde(rename = "15m")]
    Minutes15,
    #[serde(rename = "30m")]
    Minutes30,
    #[serde(rename = "60m", alias = "1h")]
    Minutes60,
    #[serde(rename = "90m")]
    Minutes90,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "5d")]
    Day5,
    #[serde(rename = "1wk")]
    Week1,
    #[serde(rename = "1mo")]
    Month1,
    #[serde(rename = "3mo")]
    Month3,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minutes1 => "1m",
            Interval::Minutes2 => "2m",
            Interval::Minutes5 => "5m",
            Interval::Minutes15 => "15m",
            Interval::Minutes30 => "30m",
            Interval::Minutes60 => "60m",
            Interval::Minutes90 => "90m",
            Interval::Day1 => "1d",
            Interval::Day5 => "5d",
            Interval::Week1 => "1wk",
            Interval::Month1 => "1mo",
            Interval::Month3 => "3mo",
        }
    }

    /// Approximate bar length, used to order timeframes from longest to shortest
    pub fn minutes(&self) -> u32 {
        match self {
            Interval::Minutes1 => 1,
            Interval::Minutes2 => 2,
            Interval::Minutes5 => 5,
            Interval::Minutes15 => 15,
            Interval::Minutes30 => 30,
            Interval::Minutes60 => 60,
            Interval::Minutes90 => 90,
            Interval::Day1 => 1_440,
            Interval::Day5 => 7_200,
            Interval::Week1 => 10_080,
            Interval::Month1 => 43_200,
            Interval::Month3 => 129_600,
        }
    }

    /// History range requested for this interval.
    ///
    /// Intraday intervals are capped by how far back the provider serves them;
    /// the rest ask for enough bars to settle the oscillator's EMAs.
    pub fn default_range(&self) -> &'static str {
        match self {
            Interval::Minutes1 => "5d",
            Interval::Minutes2 | Interval::Minutes5 | Interval::Minutes15 | Interval::Minutes30 => {
                "1mo"
            }
            Interval::Minutes60 | Interval::Minutes90 | Interval::Day1 => "6mo",
            Interval::Day5 | Interval::Week1 => "2y",
            Interval::Month1 => "10y",
            Interval::Month3 => "max",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(Interval::Minutes1),
            "2m" => Ok(Interval::Minutes2),
            "5m" => Ok(Interval::Minutes5),
            "15m" => Ok(Interval::Minutes15),
            "30m" => Ok(Interval::Minutes30),
            "60m" | "1h" => Ok(Interval::Minutes60),
            "90m" => Ok(Interval::Minutes90),
            "1d" => Ok(Interval::Day1),
            "5d" => Ok(Interval::Day5),
            "1wk" => Ok(Interval::Week1),
            "1mo" => Ok(Interval::Month1),
            "3mo" => Ok(Interval::Month3),
            other => Err(format!("unknown interval '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmaIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    pub period: u32,
}

/// Classic floor-trader pivot levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotLevels {
    pub pivot: f64,
    pub r1: f64,
    pub s1: f64,
    pub r2: f64,
    pub s2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthStatus {
    Strong,
    Weak,
}

/// Performance of a symbol relative to a benchmark over a lookback window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeStrength {
    /// Outperformance in percent
    pub value: f64,
    pub status: StrengthStatus,
    pub lookback: usize,
}

/// Indicator snapshot for one symbol, served by the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub symbol: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<RsiIndicator>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub emas: Vec<EmaIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivots: Option<PivotLevels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_pivot: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_strength: Option<RelativeStrength>,
    pub timestamp: DateTime<Utc>,
}

impl IndicatorSet {
    pub fn new(symbol: String, price: f64) -> Self {
        Self {
            symbol,
            price,
            rsi: None,
            emas: Vec::new(),
            pivots: None,
            monthly_pivot: None,
            relative_strength: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_rsi(mut self, rsi: RsiIndicator) -> Self {
        self.rsi = Some(rsi);
        self
    }

    pub fn with_emas(mut self, emas: Vec<EmaIndicator>) -> Self {
        self.emas = emas;
        self
    }

    pub fn with_pivots(mut self, pivots: PivotLevels) -> Self {
        self.pivots = Some(pivots);
        self
    }

    pub fn with_monthly_pivot(mut self, pivot: f64) -> Self {
        self.monthly_pivot = Some(pivot);
        self
    }

    pub fn with_relative_strength(mut self, rs: RelativeStrength) -> Self {
        self.relative_strength = Some(rs);
        self
    }
}
