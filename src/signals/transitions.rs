//! Signal transitions between scans

use crate::models::signal::{SignalChange, SignalReading, SignalState};
use crate::services::state_store::SignalSnapshot;

/// State a ticker is assumed to have had when nothing was stored for it
pub const DEFAULT_PREVIOUS_STATE: SignalState = SignalState::Neutral;

fn previous_state(previous: &SignalSnapshot, symbol: &str) -> SignalState {
    previous
        .get(symbol)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PREVIOUS_STATE)
}

/// Tickers whose current state differs from the stored one.
///
/// Readings without a state (no data, short history) are skipped.
pub fn detect_transitions(
    previous: &SignalSnapshot,
    current: &[(String, SignalReading)],
) -> Vec<SignalChange> {
    current
        .iter()
        .filter_map(|(symbol, reading)| {
            let current = reading.state()?;
            let previous = previous_state(previous, symbol);
            (current != previous).then(|| SignalChange {
                symbol: symbol.clone(),
                previous,
                current,
            })
        })
        .collect()
}

/// Snapshot to persist after a scan: current states overwrite stored ones,
/// tickers without a current state keep what was stored.
pub fn next_snapshot(previous: &SignalSnapshot, current: &[(String, SignalReading)]) -> SignalSnapshot {
    let mut snapshot = previous.clone();
    for (symbol, reading) in current {
        if let Some(state) = reading.state() {
            snapshot.insert(symbol.clone(), state.to_string());
        }
    }
    snapshot
}
