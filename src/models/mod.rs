//! Shared data models spanning the engine layers.

pub mod alert;
pub mod flow;
pub mod indicators;
pub mod signal;

pub use alert::{AlertRecord, DedupPolicy, RawMessage};
pub use flow::{FlowSummary, OptionFlow, OptionSide, RepeatFlow, UnusualVolume, VolumeRecord};
pub use indicators::{
    Candle, EmaIndicator, IndicatorSet, Interval, PivotLevels, RelativeStrength, RsiIndicator,
    StrengthStatus,
};
pub use signal::{
    OscillatorPoint, SignalChange, SignalReading, SignalState, SymbolReport, TimeframeReading,
};
