//! Shared candle and email builders

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use signaldesk::alerts::{MailQuery, MailSource};
use signaldesk::error::MailError;
use signaldesk::models::flow::{OptionFlow, OptionSide};
use signaldesk::models::indicators::Candle;
use signaldesk::models::RawMessage;

/// Daily candles from paired opens and closes, starting 2024-01-02
pub fn candles_from(opens: &[f64], closes: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap();
    opens
        .iter()
        .zip(closes)
        .enumerate()
        .map(|(i, (&open, &close))| {
            Candle::new(
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                1_000.0,
                start + Duration::days(i as i64),
            )
        })
        .collect()
}

/// Daily candles from closes, each opening at the previous close
pub fn trending_candles(closes: &[f64]) -> Vec<Candle> {
    let mut opens = Vec::with_capacity(closes.len());
    for (i, &close) in closes.iter().enumerate() {
        opens.push(if i == 0 { close } else { closes[i - 1] });
    }
    candles_from(&opens, closes)
}

/// Twenty bars opening at 10: closes alternate 11/9, pull back to 9 for four
/// bars, then break out to 12 on the last bar. The last bar reads Buy.
pub fn buy_breakout() -> Vec<Candle> {
    let mut closes: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 11.0 } else { 9.0 }).collect();
    closes.extend([9.0, 9.0, 9.0, 9.0, 12.0]);
    candles_from(&[10.0; 20], &closes)
}

/// Mirror image of [`buy_breakout`] around 10. The last bar reads Sell.
pub fn sell_breakdown() -> Vec<Candle> {
    let mut closes: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 9.0 } else { 11.0 }).collect();
    closes.extend([11.0, 11.0, 11.0, 11.0, 8.0]);
    candles_from(&[10.0; 20], &closes)
}

/// Single-part text email from the alert sender
pub fn alert_email(id: &str, date: &str, body: &str) -> RawMessage {
    let raw = format!(
        "From: alerts@thinkorswim.com\r\n\
         To: trader@example.com\r\n\
         Subject: Alert: tmo_long\r\n\
         Date: {}\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {}\r\n",
        date, body
    );
    RawMessage::new(id, raw.into_bytes())
}

/// HTML-only email
pub fn html_alert_email(id: &str, date: &str, html: &str) -> RawMessage {
    let raw = format!(
        "From: alerts@thinkorswim.com\r\n\
         Subject: Alert\r\n\
         Date: {}\r\n\
         Content-Type: text/html; charset=utf-8\r\n\
         \r\n\
         {}\r\n",
        date, html
    );
    RawMessage::new(id, raw.into_bytes())
}

/// Tuesday, 9 January 2024
pub const TUESDAY: &str = "Tue, 9 Jan 2024 10:15:00 -0500";
/// Saturday, 13 January 2024
pub const SATURDAY: &str = "Sat, 13 Jan 2024 10:15:00 -0500";

/// In-memory mailbox returning a fixed set of messages
#[derive(Debug, Clone, Default)]
pub struct StaticMailSource {
    messages: Vec<RawMessage>,
    unavailable: bool,
}

impl StaticMailSource {
    pub fn new(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            unavailable: false,
        }
    }

    /// A mailbox whose every search fails to connect
    pub fn unavailable() -> Self {
        Self {
            messages: Vec::new(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl MailSource for StaticMailSource {
    async fn search(&self, _query: &MailQuery) -> Result<Vec<RawMessage>, MailError> {
        if self.unavailable {
            return Err(MailError::Connection("mailbox unavailable".to_string()));
        }
        Ok(self.messages.clone())
    }
}

/// Out-of-the-money opening flow: strike 110 on a 100 underlying, 200
/// contracts at the ask (`AA`), ten days to the 2024-01-19 expiry
pub fn option_flow(ticker: &str, side: OptionSide, premium: f64) -> OptionFlow {
    OptionFlow {
        ticker: ticker.to_string(),
        expiration: NaiveDate::from_ymd_opt(2024, 1, 19).unwrap(),
        days_to_expiration: 10,
        strike: 110.0,
        side,
        reference_price: 100.0,
        size: 200,
        option_price: None,
        premium,
        side_code: Some("AA".to_string()),
        is_unusual: false,
        is_golden_sweep: false,
        is_opening: true,
        money_type: "OUT_THE_MONEY".to_string(),
        rsi: None,
        change_5d: None,
        score: 0.0,
    }
}

/// Same flow with a given score
pub fn scored_flow(ticker: &str, side: OptionSide, premium: f64, score: f64) -> OptionFlow {
    OptionFlow {
        score,
        ..option_flow(ticker, side, premium)
    }
}
