//! One scan cycle: momentum scan, transition alerts, email alert extraction

use super::market_hours::{is_market_open, market_date};
use crate::alerts::{AlertScanner, AlertTable, ProcessedCursor};
use crate::models::alert::{AlertRecord, DedupPolicy};
use crate::models::indicators::Interval;
use crate::models::signal::{SignalChange, SignalReading, SymbolReport};
use crate::report;
use crate::services::market_data::MarketDataProvider;
use crate::services::state_store::{SignalSnapshot, SignalStateStore};
use crate::services::webhook::WebhookNotifier;
use crate::signals::{detect_transitions, next_snapshot, Scanner};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// What one cycle did
#[derive(Debug, Clone, Default)]
pub struct CycleSummary {
    /// False when the cycle was skipped outside market hours
    pub ran: bool,
    pub symbols: usize,
    pub changes: Vec<SignalChange>,
    pub new_alerts: Vec<AlertRecord>,
    pub notifications: usize,
}

/// Alert state carried from one cycle to the next
#[derive(Debug, Default)]
struct AlertState {
    cursor: ProcessedCursor,
    tables: HashMap<String, AlertTable>,
}

/// Settings for a [`ScanCycle`] that are not owned by its collaborators
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub symbols: Vec<String>,
    pub timeframes: Vec<Interval>,
    pub transition_timeframe: Interval,
    pub alert_keywords: Vec<String>,
    pub dedup_policy: DedupPolicy,
    pub ignore_market_hours: bool,
}

pub struct ScanCycle {
    settings: CycleSettings,
    provider: Arc<dyn MarketDataProvider>,
    scanner: Scanner,
    store: SignalStateStore,
    alert_scanner: Option<AlertScanner>,
    notifier: Option<WebhookNotifier>,
    alerts: Mutex<AlertState>,
}

impl ScanCycle {
    pub fn new(
        settings: CycleSettings,
        provider: Arc<dyn MarketDataProvider>,
        scanner: Scanner,
        store: SignalStateStore,
    ) -> Self {
        Self {
            settings,
            provider,
            scanner,
            store,
            alert_scanner: None,
            notifier: None,
            alerts: Mutex::new(AlertState::default()),
        }
    }

    pub fn with_alert_scanner(mut self, alert_scanner: AlertScanner) -> Self {
        self.alert_scanner = Some(alert_scanner);
        self
    }

    pub fn with_notifier(mut self, notifier: WebhookNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Run one cycle at `now`.
    ///
    /// Outside market hours nothing is fetched unless `ignore_market_hours`
    /// is set. Failures in one stage are logged and never abort the cycle.
    pub async fn run_once(&self, now: DateTime<Utc>) -> CycleSummary {
        if !self.settings.ignore_market_hours && !is_market_open(now) {
            info!("Market is closed, skipping scan cycle");
            return CycleSummary::default();
        }

        let mut summary = CycleSummary {
            ran: true,
            ..CycleSummary::default()
        };

        let reports = self
            .scanner
            .scan(&self.settings.symbols, &self.settings.timeframes)
            .await;
        summary.symbols = reports.len();

        summary.changes = self.process_transitions(&reports).await;
        if !summary.changes.is_empty() {
            let table = report::signal_table(&reports, &self.settings.timeframes);
            if self
                .notify(&report::change_message(&summary.changes), Some(&table))
                .await
            {
                summary.notifications += 1;
            }
        }

        summary.new_alerts = self.process_alerts(now).await;
        if !summary.new_alerts.is_empty() {
            let prices = self.latest_prices(&summary.new_alerts).await;
            let table = report::alert_table(&summary.new_alerts, &prices);
            let message = format!("{} new alert row(s)", summary.new_alerts.len());
            if self.notify(&message, Some(&table)).await {
                summary.notifications += 1;
            }
        }

        summary
    }

    async fn process_transitions(&self, reports: &[SymbolReport]) -> Vec<SignalChange> {
        let interval = self.settings.transition_timeframe;
        let current: Vec<(String, SignalReading)> = reports
            .iter()
            .filter_map(|r| r.reading(interval).map(|reading| (r.symbol.clone(), reading)))
            .collect();

        let previous = match self.store.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %self.store.path().display(), error = %e, "Failed to load signal state, starting empty");
                SignalSnapshot::new()
            }
        };

        let changes = detect_transitions(&previous, &current);
        for change in &changes {
            info!(symbol = %change.symbol, previous = %change.previous, current = %change.current, "Signal change");
        }

        let snapshot = next_snapshot(&previous, &current);
        if snapshot != previous {
            if let Err(e) = self.store.save(&snapshot).await {
                warn!(path = %self.store.path().display(), error = %e, "Failed to save signal state");
            }
        }

        changes
    }

    async fn process_alerts(&self, now: DateTime<Utc>) -> Vec<AlertRecord> {
        let Some(ref alert_scanner) = self.alert_scanner else {
            return Vec::new();
        };

        let today = market_date(now);
        let mut state = self.alerts.lock().await;
        let mut new_rows = Vec::new();

        for keyword in &self.settings.alert_keywords {
            let cursor = std::mem::take(&mut state.cursor);
            let extraction = alert_scanner.scan(keyword, today, cursor).await;
            state.cursor = extraction.cursor;

            let policy = self.settings.dedup_policy;
            let table = state
                .tables
                .entry(keyword.clone())
                .or_insert_with(|| AlertTable::new(policy));
            new_rows.extend(table.merge(extraction.records));
        }

        new_rows
    }

    async fn latest_prices(&self, rows: &[AlertRecord]) -> HashMap<String, f64> {
        let mut prices = HashMap::new();
        for record in rows {
            if prices.contains_key(&record.ticker) {
                continue;
            }
            match self.provider.get_latest_price(&record.ticker).await {
                Ok(price) => {
                    prices.insert(record.ticker.clone(), price);
                }
                Err(e) => warn!(ticker = %record.ticker, error = %e, "No price for alert ticker"),
            }
        }
        prices
    }

    async fn notify(&self, message: &str, table: Option<&str>) -> bool {
        match self.notifier {
            Some(ref notifier) => notifier.notify(message, table).await,
            None => false,
        }
    }

    /// Current alert rows for a keyword
    pub async fn alert_rows(&self, keyword: &str) -> Vec<AlertRecord> {
        self.alerts
            .lock()
            .await
            .tables
            .get(keyword)
            .map(AlertTable::rows)
            .unwrap_or_default()
    }
}
