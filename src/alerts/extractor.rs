//! Alert extraction over a batch of raw messages

use super::body::decode_message;
use super::cursor::ProcessedCursor;
use super::table::AlertTable;
use super::template::AlertTemplate;
use crate::models::alert::{AlertRecord, DedupPolicy, RawMessage};
use chrono::{Datelike, NaiveDate, Weekday};
use tracing::{debug, warn};

/// Outcome of one extraction pass
#[derive(Debug, Clone)]
pub struct Extraction {
    /// New rows, deduplicated and ordered by date then ticker
    pub records: Vec<AlertRecord>,
    /// The cursor passed in, with this batch's message ids added
    pub cursor: ProcessedCursor,
    /// Messages that could not be decoded
    pub skipped: usize,
    /// Messages dropped because they were sent on a weekend
    pub weekend: usize,
}

impl Extraction {
    pub fn empty(cursor: ProcessedCursor) -> Self {
        Self {
            records: Vec::new(),
            cursor,
            skipped: 0,
            weekend: 0,
        }
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlertExtractor {
    policy: DedupPolicy,
}

impl AlertExtractor {
    pub fn new(policy: DedupPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    /// Extract `keyword` alerts from `messages`.
    ///
    /// Messages already recorded in `cursor` for this keyword are ignored, so
    /// feeding the same message twice never yields a second row. Weekend
    /// messages and undecodable ones are dropped (the latter with a warning);
    /// both are still recorded in the cursor.
    pub fn extract(
        &self,
        messages: &[RawMessage],
        keyword: &str,
        mut cursor: ProcessedCursor,
    ) -> Extraction {
        let template = match AlertTemplate::new(keyword) {
            Ok(template) => template,
            Err(e) => {
                warn!(keyword = %keyword, error = %e, "Cannot build alert pattern");
                return Extraction::empty(cursor);
            }
        };

        let mut table = AlertTable::new(self.policy);
        let mut skipped = 0;
        let mut weekend = 0;

        for message in messages {
            if !cursor.mark(keyword, &message.id) {
                debug!(keyword = %keyword, message_id = %message.id, "Message already processed");
                continue;
            }

            let decoded = match decode_message(&message.raw) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!(
                        keyword = %keyword,
                        message_id = %message.id,
                        error = %e,
                        "Skipping malformed alert email"
                    );
                    skipped += 1;
                    continue;
                }
            };

            if is_weekend(decoded.date) {
                debug!(keyword = %keyword, message_id = %message.id, date = %decoded.date, "Skipping weekend alert");
                weekend += 1;
                continue;
            }

            let rows = template
                .tickers(&decoded.text)
                .into_iter()
                .map(|ticker| AlertRecord::new(ticker, decoded.date, keyword));
            table.merge(rows);
        }

        Extraction {
            records: table.rows(),
            cursor,
            skipped,
            weekend,
        }
    }
}
