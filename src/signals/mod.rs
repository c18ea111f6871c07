//! Signal evaluation: the momentum engine, batch scanning, state transitions

pub mod engine;
pub mod scanner;
pub mod transitions;

pub use engine::SignalEngine;
pub use scanner::{sort_reports, Scanner};
pub use transitions::{detect_transitions, next_snapshot};
