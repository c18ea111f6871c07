//! Technical indicators computed over candle series

pub mod momentum;
pub mod structure;
pub mod trend;
