//! Core application primitives (scan cycle, scheduling, HTTP surface)

pub mod http;
pub mod market_hours;
pub mod runtime;
pub mod scheduler;

pub use http::*;
pub use market_hours::*;
pub use runtime::*;
pub use scheduler::*;
