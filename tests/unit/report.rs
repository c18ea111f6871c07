//! Unit tests for markdown rendering

use crate::fixtures::{option_flow, scored_flow};
use chrono::NaiveDate;
use signaldesk::models::alert::AlertRecord;
use signaldesk::models::flow::{FlowSummary, OptionFlow, OptionSide};
use signaldesk::models::indicators::Interval;
use signaldesk::models::signal::{SignalChange, SignalReading, SignalState, SymbolReport, TimeframeReading};
use signaldesk::report::{
    alert_table, change_message, flow_newsletter, flow_summary_table, money, signal_table, FlowSort,
    NewsletterOptions,
};
use std::collections::HashMap;

#[test]
fn signal_table_has_a_column_per_timeframe() {
    let mut report = SymbolReport::new("AAPL");
    report.price = Some(190.456);
    report.ema_21 = Some(185.0);
    report.readings = vec![
        TimeframeReading { interval: Interval::Day1, reading: SignalReading::Buy },
        TimeframeReading { interval: Interval::Week1, reading: SignalReading::NoData },
    ];

    let table = signal_table(&[report], &[Interval::Day1, Interval::Week1]);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(
        lines[0],
        "| Symbol | Price | 1d | 1wk | EMA 21 | EMA 50 | EMA 200 | Monthly Pivot |"
    );
    assert_eq!(lines[1], "| --- | --- | --- | --- | --- | --- | --- | --- |");
    assert_eq!(lines[2], "| AAPL | 190.46 | Buy | No Data | 185.00 | - | - | - |");
}

#[test]
fn alert_table_shows_latest_price() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
    let rows = vec![
        AlertRecord::new("AAPL", date, "tmo_long"),
        AlertRecord::new("MSFT", date, "tmo_long"),
    ];
    let prices = HashMap::from([("AAPL".to_string(), 185.2)]);

    let table = alert_table(&rows, &prices);
    assert!(table.contains("| AAPL | 2024-01-09 | tmo_long | 185.20 |"));
    assert!(table.contains("| MSFT | 2024-01-09 | tmo_long | - |"));
}

#[test]
fn change_message_lists_each_change() {
    let changes = vec![
        SignalChange { symbol: "AAPL".into(), previous: SignalState::Neutral, current: SignalState::Buy },
        SignalChange { symbol: "TSLA".into(), previous: SignalState::Buy, current: SignalState::Sell },
    ];
    assert_eq!(
        change_message(&changes),
        "Signal change for AAPL: Neutral -> Buy\nSignal change for TSLA: Buy -> Sell"
    );
}

#[test]
fn money_groups_thousands() {
    assert_eq!(money(1_234_567.5), "1,234,567.50");
    assert_eq!(money(999.0), "999.00");
    assert_eq!(money(0.0), "0.00");
    assert_eq!(money(-1_500.0), "-1,500.00");
}

#[test]
fn flow_summary_table_lists_series() {
    let summary = FlowSummary {
        symbol: "AAPL".to_string(),
        expiration: NaiveDate::from_ymd_opt(2024, 1, 19).unwrap(),
        strike: 190.0,
        side: OptionSide::Call,
        last_price: 2.5,
        volume: 400,
    };
    let table = flow_summary_table(&[summary]);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(
        lines[0],
        "| Symbol | Expiration | Strike | Call/Put | Last Price | Volume |"
    );
    assert_eq!(lines[2], "| AAPL | 2024-01-19 | 190.00 | CALL | 2.50 | 400 |");
}

fn newsletter_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()
}

#[test]
fn newsletter_sections() {
    let jan12 = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
    let flows = vec![
        OptionFlow {
            expiration: jan12,
            size: 100,
            ..option_flow("SPY", OptionSide::Call, 200_000.0)
        },
        OptionFlow {
            expiration: jan12,
            size: 50,
            ..option_flow("QQQ", OptionSide::Put, 100_000.0)
        },
        OptionFlow {
            rsi: Some(65.0),
            is_unusual: true,
            ..scored_flow("NVDA", OptionSide::Call, 150_000.0, 14.0)
        },
    ];

    let text = flow_newsletter(&flows, &NewsletterOptions::default(), newsletter_day());
    assert!(text.starts_with("OUT-THE-MONEY OPTIONS FLOW SUMMARY - Jan 09, 2024\n"));
    assert!(text.contains("Market Sentiment: BULLISH"));
    assert!(text.contains("Total Premium: $300,000.00"));
    assert!(text.contains("Total Contracts: 150"));
    assert!(text.contains("Put/Call Ratio: 0.50"));
    assert!(text.contains(
        "=== HIGH CONVICTION PLAYS ===\n\
         - NVDA CALL $110.00 exp 2024-01-19 - $150,000.00 (200 contracts, 10.0% move, bullish, AA) [UNUSUAL] [Score: 14.0] [RSI: 65.0]\n"
    ));

    let listed = text.split("=== OTM FLOWS ===").nth(1).unwrap();
    assert!(listed.contains("- NVDA CALL $110.00"));
    assert!(!listed.contains("[RSI"));
    assert!(!listed.contains("SPY"));
    assert!(text.ends_with("Only for educational purposes!"));
}

#[test]
fn newsletter_without_flows() {
    let text = flow_newsletter(&[], &NewsletterOptions::default(), newsletter_day());
    assert!(text.contains("No OTM market index flows detected."));
    assert!(text.contains("No high conviction plays detected."));
    assert!(text.contains("No aggressive OTM flows detected."));
    assert!(!text.contains("UNUSUAL VOLUME"));
}

#[test]
fn newsletter_flow_list_honours_options() {
    let flows = vec![
        scored_flow("AAPL", OptionSide::Call, 500_000.0, 5.0),
        scored_flow("MSFT", OptionSide::Call, 200_000.0, 9.0),
        scored_flow("TINY", OptionSide::Call, 20_000.0, 20.0),
        OptionFlow {
            side_code: Some("A".to_string()),
            ..scored_flow("AMD", OptionSide::Call, 300_000.0, 8.0)
        },
    ];
    let options = NewsletterOptions {
        sort_by: FlowSort::Premium,
        include_scores: false,
        top_n: 1,
        ..NewsletterOptions::default()
    };

    let text = flow_newsletter(&flows, &options, newsletter_day());
    let listed = text.split("=== OTM FLOWS ===").nth(1).unwrap();
    assert!(listed.contains("- AAPL CALL"));
    assert!(!listed.contains("MSFT"));
    assert!(!listed.contains("[Score"));

    let by_score = NewsletterOptions::default();
    let text = flow_newsletter(&flows, &by_score, newsletter_day());
    let listed = text.split("=== OTM FLOWS ===").nth(1).unwrap();
    let msft = listed.find("MSFT").unwrap();
    let aapl = listed.find("AAPL").unwrap();
    assert!(msft < aapl);
    assert!(!listed.contains("TINY"));
    assert!(!listed.contains("AMD"));
}
