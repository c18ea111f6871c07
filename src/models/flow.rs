use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Option right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionSide::Call => "CALL",
            OptionSide::Put => "PUT",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionSide {
    type Err = String;

    /// Accepts the exchange's `C`/`P` as well as `CALL`/`PUT`, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" | "CALL" | "CALLS" => Ok(OptionSide::Call),
            "P" | "PUT" | "PUTS" => Ok(OptionSide::Put),
            other => Err(format!("unknown option side '{}'", other)),
        }
    }
}

/// One line of the exchange's per-series volume file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeRecord {
    pub symbol: String,
    pub expiration: NaiveDate,
    pub strike: f64,
    pub side: OptionSide,
    pub last_price: f64,
    pub volume: u64,
}

/// Volume summed over identical series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub symbol: String,
    pub expiration: NaiveDate,
    pub strike: f64,
    pub side: OptionSide,
    pub last_price: f64,
    pub volume: u64,
}

/// A single reported options trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionFlow {
    pub ticker: String,
    pub expiration: NaiveDate,
    pub days_to_expiration: i64,
    pub strike: f64,
    pub side: OptionSide,
    pub reference_price: f64,
    /// Contracts traded
    pub size: u64,
    pub option_price: Option<f64>,
    /// Total premium paid, in dollars
    pub premium: f64,
    /// Aggressiveness: `AA`/`A` at or above the ask, `BB`/`B` at or below the bid
    pub side_code: Option<String>,
    pub is_unusual: bool,
    pub is_golden_sweep: bool,
    pub is_opening: bool,
    pub money_type: String,
    pub rsi: Option<f64>,
    pub change_5d: Option<f64>,
    pub score: f64,
}

impl OptionFlow {
    /// Distance from the underlying to the strike, in percent
    pub fn move_pct(&self) -> f64 {
        if self.reference_price <= 0.0 {
            return 0.0;
        }
        ((self.strike - self.reference_price) / self.reference_price * 100.0).abs()
    }
}

/// Ticker whose premium leans heavily to one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusualVolume {
    pub ticker: String,
    pub direction: OptionSide,
    /// Dominant side premium over the other side's
    pub ratio: f64,
    pub total_premium: f64,
    pub flow_count: usize,
}

/// Several flows in the same ticker and direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatFlow {
    pub ticker: String,
    pub direction: OptionSide,
    pub flow_count: usize,
    pub total_premium: f64,
    pub avg_score: f64,
}
