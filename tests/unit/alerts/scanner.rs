//! Unit tests for the per-keyword alert scanner

use crate::fixtures::{alert_email, StaticMailSource, TUESDAY};
use chrono::NaiveDate;
use signaldesk::alerts::{AlertExtractor, AlertScanner, MailQuery, ProcessedCursor};
use signaldesk::metrics::Metrics;
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

#[tokio::test]
async fn scan_extracts_rows_and_counts_them() {
    let source = StaticMailSource::new(vec![alert_email(
        "1",
        TUESDAY,
        "New symbols: AAPL, MSFT were added to tmo_long",
    )]);
    let metrics = Arc::new(Metrics::new().unwrap());
    let scanner = AlertScanner::new(
        Arc::new(source),
        AlertExtractor::default(),
        "alerts@thinkorswim.com",
        2,
    )
    .with_metrics(metrics.clone());

    let extraction = scanner.scan("tmo_long", today(), ProcessedCursor::new()).await;
    assert_eq!(extraction.records.len(), 2);
    assert_eq!(metrics.alert_rows_extracted_total.get(), 2);
}

#[tokio::test]
async fn unavailable_source_returns_empty_and_keeps_cursor() {
    let scanner = AlertScanner::new(
        Arc::new(StaticMailSource::unavailable()),
        AlertExtractor::default(),
        "alerts@thinkorswim.com",
        2,
    );
    let mut cursor = ProcessedCursor::new();
    cursor.mark("tmo_long", "42");

    let extraction = scanner.scan("tmo_long", today(), cursor.clone()).await;
    assert!(extraction.records.is_empty());
    assert_eq!(extraction.cursor, cursor);
}

#[test]
fn imap_criteria_format() {
    let query = MailQuery::new(
        "alerts@thinkorswim.com",
        "tmo_long",
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
    );
    assert_eq!(
        query.to_imap_criteria(),
        "FROM \"alerts@thinkorswim.com\" SUBJECT \"tmo_long\" SINCE 08-Jan-2024"
    );
}
