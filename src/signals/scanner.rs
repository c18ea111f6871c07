//! Multi-symbol, multi-timeframe scan

use crate::indicators::momentum::TmoParams;
use crate::indicators::structure::monthly_pivot;
use crate::indicators::trend::{calculate_ema, DASHBOARD_EMA_PERIODS};
use crate::metrics::Metrics;
use crate::models::indicators::Interval;
use crate::models::signal::{SignalReading, SymbolReport, TimeframeReading};
use crate::services::market_data::MarketDataProvider;
use crate::signals::engine::SignalEngine;
use chrono::Datelike;
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// History fetched for the EMA and pivot columns
const LEVELS_RANGE: &str = "1y";

pub struct Scanner {
    provider: Arc<dyn MarketDataProvider>,
    params: TmoParams,
    concurrency: usize,
    include_levels: bool,
    metrics: Option<Arc<Metrics>>,
}

impl Scanner {
    pub fn new(provider: Arc<dyn MarketDataProvider>, params: TmoParams) -> Self {
        Self {
            provider,
            params,
            concurrency: 8,
            include_levels: false,
            metrics: None,
        }
    }

    /// Maximum number of symbols fetched at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Also compute EMA 21/50/200 and the monthly pivot from daily bars
    pub fn with_levels(mut self, include_levels: bool) -> Self {
        self.include_levels = include_levels;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn params(&self) -> &TmoParams {
        &self.params
    }

    pub async fn scan_symbol(&self, symbol: &str, timeframes: &[Interval]) -> SymbolReport {
        let mut report = SymbolReport::new(symbol);

        for &interval in timeframes {
            let fetched = self
                .provider
                .get_candles(symbol, interval, interval.default_range())
                .await;
            if let Err(ref e) = fetched {
                warn!(symbol = %symbol, interval = %interval, error = %e, "No data for symbol");
            }

            let reading = SignalEngine::read(&fetched, &self.params);
            if let Some(ref metrics) = self.metrics {
                metrics.symbol_scans_total.inc();
                if reading == SignalReading::NoData {
                    metrics.symbol_no_data_total.inc();
                }
            }
            debug!(symbol = %symbol, interval = %interval, reading = %reading, "Evaluated timeframe");
            report.readings.push(TimeframeReading { interval, reading });
        }

        match self.provider.get_latest_price(symbol).await {
            Ok(price) => report.price = Some(price),
            Err(e) => debug!(symbol = %symbol, error = %e, "Latest price unavailable"),
        }

        if self.include_levels {
            match self
                .provider
                .get_candles(symbol, Interval::Day1, LEVELS_RANGE)
                .await
            {
                Ok(daily) => {
                    let ema = |period| calculate_ema(&daily, period).map(|e| e.value);
                    let [p21, p50, p200] = DASHBOARD_EMA_PERIODS;
                    report.ema_21 = ema(p21);
                    report.ema_50 = ema(p50);
                    report.ema_200 = ema(p200);
                    report.monthly_pivot = daily.last().and_then(|last| {
                        monthly_pivot(&daily, last.timestamp.year(), last.timestamp.month())
                    });
                }
                Err(e) => debug!(symbol = %symbol, error = %e, "Daily levels unavailable"),
            }
        }

        report
    }

    /// Scan every symbol; symbols are fetched concurrently and the result is
    /// ranked with [`sort_reports`]
    pub async fn scan(&self, symbols: &[String], timeframes: &[Interval]) -> Vec<SymbolReport> {
        let mut reports: Vec<SymbolReport> = stream::iter(symbols.iter().cloned())
            .map(|symbol| async move { self.scan_symbol(&symbol, timeframes).await })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        sort_reports(&mut reports, timeframes);
        reports
    }
}

/// Rank rows by signal priority (Buy, Neutral, Sell, then missing), comparing
/// the longest timeframe first; ties fall back to the symbol.
pub fn sort_reports(reports: &mut [SymbolReport], timeframes: &[Interval]) {
    let mut ordered: Vec<Interval> = timeframes.to_vec();
    ordered.sort_by_key(|interval| std::cmp::Reverse(interval.minutes()));

    let key = |report: &SymbolReport| -> Vec<u8> {
        ordered
            .iter()
            .map(|&interval| report.reading(interval).map(|r| r.priority()).unwrap_or(0))
            .collect()
    };

    reports.sort_by(|a, b| key(b).cmp(&key(a)).then_with(|| a.symbol.cmp(&b.symbol)));
}
