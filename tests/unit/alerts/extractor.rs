//! Unit tests for alert extraction

use crate::fixtures::{alert_email, SATURDAY, TUESDAY};
use chrono::NaiveDate;
use signaldesk::alerts::extractor::is_weekend;
use signaldesk::alerts::{AlertExtractor, ProcessedCursor};
use signaldesk::models::alert::{AlertRecord, DedupPolicy, RawMessage};

fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()
}

#[test]
fn tuesday_alert_yields_two_records() {
    let messages = vec![alert_email(
        "101",
        TUESDAY,
        "New symbols: AAPL, MSFT were added to tmo_long",
    )];
    let extraction = AlertExtractor::default().extract(&messages, "tmo_long", ProcessedCursor::new());

    assert_eq!(
        extraction.records,
        vec![
            AlertRecord::new("AAPL", tuesday(), "tmo_long"),
            AlertRecord::new("MSFT", tuesday(), "tmo_long"),
        ]
    );
    assert_eq!(extraction.skipped, 0);
    assert!(extraction.cursor.is_processed("tmo_long", "101"));
}

#[test]
fn weekend_messages_are_dropped() {
    let messages = vec![alert_email(
        "7",
        SATURDAY,
        "New symbols: AAPL were added to tmo_long",
    )];
    let extraction = AlertExtractor::default().extract(&messages, "tmo_long", ProcessedCursor::new());
    assert!(extraction.records.is_empty());
    assert_eq!(extraction.weekend, 1);
}

#[test]
fn is_weekend_checks_calendar_day() {
    assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 1, 13).unwrap()));
    assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()));
    assert!(!is_weekend(tuesday()));
}

#[test]
fn replaying_with_returned_cursor_adds_nothing() {
    let extractor = AlertExtractor::default();
    let messages = vec![alert_email(
        "101",
        TUESDAY,
        "New symbols: AAPL, MSFT were added to tmo_long",
    )];

    let first = extractor.extract(&messages, "tmo_long", ProcessedCursor::new());
    assert_eq!(first.records.len(), 2);

    let second = extractor.extract(&messages, "tmo_long", first.cursor.clone());
    assert!(second.records.is_empty());
    assert_eq!(second.cursor, first.cursor);
}

#[test]
fn cursor_is_scoped_per_keyword() {
    let extractor = AlertExtractor::default();
    let messages = vec![alert_email(
        "5",
        TUESDAY,
        "New symbols: AAPL were added to tmo_long. New symbols: TSLA were added to orb_bull",
    )];

    let long = extractor.extract(&messages, "tmo_long", ProcessedCursor::new());
    let bull = extractor.extract(&messages, "orb_bull", long.cursor);
    assert_eq!(bull.records, vec![AlertRecord::new("TSLA", tuesday(), "orb_bull")]);
    assert_eq!(bull.cursor.processed_count("tmo_long"), 1);
    assert_eq!(bull.cursor.processed_count("orb_bull"), 1);
}

#[test]
fn malformed_messages_are_skipped() {
    let messages = vec![
        RawMessage::new("bad", b"Subject: no date\r\n\r\nNew symbols: AAPL were added to tmo_long".to_vec()),
        alert_email("good", TUESDAY, "New symbols: MSFT were added to tmo_long"),
    ];
    let extraction = AlertExtractor::default().extract(&messages, "tmo_long", ProcessedCursor::new());
    assert_eq!(extraction.skipped, 1);
    assert_eq!(extraction.records, vec![AlertRecord::new("MSFT", tuesday(), "tmo_long")]);
}

#[test]
fn dedup_policy_applies_within_a_batch() {
    let messages = vec![
        alert_email("1", "Mon, 8 Jan 2024 10:00:00 -0500", "New symbols: AAPL were added to tmo_long"),
        alert_email("2", TUESDAY, "New symbols: AAPL were added to tmo_long"),
    ];

    let latest = AlertExtractor::new(DedupPolicy::LatestPerTicker)
        .extract(&messages, "tmo_long", ProcessedCursor::new());
    assert_eq!(latest.records, vec![AlertRecord::new("AAPL", tuesday(), "tmo_long")]);

    let distinct = AlertExtractor::new(DedupPolicy::DistinctPerDay)
        .extract(&messages, "tmo_long", ProcessedCursor::new());
    assert_eq!(distinct.records.len(), 2);
}
