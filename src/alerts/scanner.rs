//! Per-keyword alert scan against a mail source

use super::cursor::ProcessedCursor;
use super::extractor::{AlertExtractor, Extraction};
use super::mailbox::{MailQuery, MailSource};
use crate::metrics::Metrics;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

pub struct AlertScanner {
    source: Arc<dyn MailSource>,
    extractor: AlertExtractor,
    sender: String,
    lookback_days: i64,
    metrics: Option<Arc<Metrics>>,
}

impl AlertScanner {
    pub fn new(
        source: Arc<dyn MailSource>,
        extractor: AlertExtractor,
        sender: impl Into<String>,
        lookback_days: i64,
    ) -> Self {
        Self {
            source,
            extractor,
            sender: sender.into(),
            lookback_days,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Fetch and extract alerts for one keyword.
    ///
    /// A mail source failure is logged and produces an empty extraction with
    /// the cursor unchanged; other keywords are unaffected.
    pub async fn scan(&self, keyword: &str, today: NaiveDate, cursor: ProcessedCursor) -> Extraction {
        let since = today - Duration::days(self.lookback_days.max(0));
        let query = MailQuery::new(&self.sender, keyword, since);

        let messages = match self.source.search(&query).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(keyword = %keyword, error = %e, "Mail source unavailable, no alerts for keyword");
                return Extraction::empty(cursor);
            }
        };

        let extraction = self.extractor.extract(&messages, keyword, cursor);

        if let Some(ref metrics) = self.metrics {
            metrics
                .alert_rows_extracted_total
                .inc_by(extraction.records.len() as u64);
            metrics
                .alert_messages_skipped_total
                .inc_by(extraction.skipped as u64);
        }

        info!(
            keyword = %keyword,
            messages = messages.len(),
            rows = extraction.records.len(),
            skipped = extraction.skipped,
            weekend = extraction.weekend,
            "Alert scan complete"
        );

        extraction
    }
}
