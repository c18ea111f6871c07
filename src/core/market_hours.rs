//! US equity regular session check

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::America::New_York;

fn session_bounds() -> (NaiveTime, NaiveTime) {
    (
        NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN),
        NaiveTime::from_hms_opt(16, 0, 0).unwrap_or(NaiveTime::MIN),
    )
}

/// Monday to Friday, 09:30 to 16:00 New York time (both ends inclusive).
/// Exchange holidays are not accounted for.
pub fn is_market_open(now: DateTime<Utc>) -> bool {
    let local = now.with_timezone(&New_York);
    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }
    let (open, close) = session_bounds();
    let time = local.time();
    time >= open && time <= close
}

/// Calendar date in New York, used as "today" for alert lookback windows
pub fn market_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&New_York).date_naive()
}
