//! Price structure levels: pivots

pub mod pivots;

pub use pivots::*;
