//! Momentum indicators: the TMO oscillator, RSI, relative strength

pub mod relative_strength;
pub mod rsi;
pub mod tmo;

pub use relative_strength::*;
pub use rsi::*;
pub use tmo::*;
