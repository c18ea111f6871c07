//! Prometheus metrics for scans, alert extraction and the HTTP surface

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
    pub symbol_scans_total: IntCounter,
    pub symbol_no_data_total: IntCounter,
    pub alert_rows_extracted_total: IntCounter,
    pub alert_messages_skipped_total: IntCounter,
    pub webhook_failures_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let symbol_scans_total = IntCounter::new(
            "symbol_scans_total",
            "Symbol/timeframe pairs evaluated by the signal engine",
        )?;
        let symbol_no_data_total = IntCounter::new(
            "symbol_no_data_total",
            "Symbol/timeframe pairs for which the provider returned no data",
        )?;
        let alert_rows_extracted_total = IntCounter::new(
            "alert_rows_extracted_total",
            "Alert rows extracted from inbound emails",
        )?;
        let alert_messages_skipped_total = IntCounter::new(
            "alert_messages_skipped_total",
            "Alert emails skipped because they could not be parsed",
        )?;
        let webhook_failures_total =
            IntCounter::new("webhook_failures_total", "Webhook deliveries that failed")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(symbol_scans_total.clone()))?;
        registry.register(Box::new(symbol_no_data_total.clone()))?;
        registry.register(Box::new(alert_rows_extracted_total.clone()))?;
        registry.register(Box::new(alert_messages_skipped_total.clone()))?;
        registry.register(Box::new(webhook_failures_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            symbol_scans_total,
            symbol_no_data_total,
            alert_rows_extracted_total,
            alert_messages_skipped_total,
            webhook_failures_total,
        })
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
