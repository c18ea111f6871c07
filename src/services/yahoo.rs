//! Yahoo Finance chart API provider

use crate::error::MarketDataError;
use crate::models::indicators::{Candle, Interval};
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) signaldesk/0.1";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl ChartResult {
    /// Zip the column arrays into candles, dropping bars without open or close
    fn into_candles(self) -> Vec<Candle> {
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

        self.timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let open = at(&quote.open, i)?;
                let close = at(&quote.close, i)?;
                let timestamp = DateTime::from_timestamp(ts, 0)?;
                let high = at(&quote.high, i).unwrap_or(open.max(close));
                let low = at(&quote.low, i).unwrap_or(open.min(close));
                let volume = at(&quote.volume, i).unwrap_or(0.0);
                Some(Candle::new(open, high, low, close, volume, timestamp))
            })
            .collect()
    }
}

pub struct YahooFinanceProvider {
    base_url: String,
    client: reqwest::Client,
    max_retries: usize,
}

impl YahooFinanceProvider {
    /// Provider with its own HTTP client bounded by `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            max_retries: 2,
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn chart_url(&self, symbol: &str, interval: Interval, range: &str) -> Result<Url, MarketDataError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| MarketDataError::Payload(format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| MarketDataError::Payload("base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(&["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("interval", interval.as_str())
            .append_pair("range", range)
            .append_pair("includePrePost", "false");
        Ok(url)
    }

    async fn fetch_chart_once(
        &self,
        symbol: &str,
        interval: Interval,
        range: &str,
    ) -> Result<ChartResult, MarketDataError> {
        let url = self.chart_url(symbol, interval, range)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            return Err(MarketDataError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: ChartResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(MarketDataError::Payload(e.to_string())),
            Err(_) => {
                return Err(MarketDataError::Status {
                    symbol: symbol.to_string(),
                    status: status.as_u16(),
                })
            }
        };

        if let Some(err) = parsed.chart.error {
            return Err(MarketDataError::Provider {
                symbol: symbol.to_string(),
                message: format!("{}: {}", err.code, err.description),
            });
        }

        parsed
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        interval: Interval,
        range: &str,
    ) -> Result<ChartResult, MarketDataError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(250))
            .with_max_times(self.max_retries);

        (|| self.fetch_chart_once(symbol, interval, range))
            .retry(backoff)
            .when(MarketDataError::is_transient)
            .notify(|err: &MarketDataError, delay: Duration| {
                warn!(
                    symbol = %symbol,
                    interval = %interval,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying chart request"
                );
            })
            .await
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        interval: Interval,
        range: &str,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let candles = self.fetch_chart(symbol, interval, range).await?.into_candles();
        if candles.is_empty() {
            return Err(MarketDataError::NoData(format!("{} ({})", symbol, interval)));
        }
        debug!(
            symbol = %symbol,
            interval = %interval,
            count = candles.len(),
            "Fetched candles"
        );
        Ok(candles)
    }

    async fn get_latest_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        let chart = self.fetch_chart(symbol, Interval::Day1, "5d").await?;
        if let Some(price) = chart.meta.regular_market_price {
            return Ok(price);
        }
        chart
            .into_candles()
            .last()
            .map(|c| c.close)
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
    }
}
