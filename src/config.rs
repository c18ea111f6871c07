//! Environment-driven configuration
//!
//! Every setting has a default so the one-shot scanner runs with an empty
//! environment. Values are read through a lookup closure so tests can supply
//! their own map instead of mutating the process environment.

use crate::error::ConfigError;
use crate::indicators::momentum::TmoParams;
use crate::models::alert::DedupPolicy;
use crate::models::indicators::Interval;
use crate::services::cboe::DEFAULT_VOLUME_URLS;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "AMZN", "GOOGL", "QQQ", "NVDA", "TSLA", "META", "UNH", "JNJ", "V", "PG",
    "XOM", "JPM", "MA", "CVX", "HD", "LLY", "MRK", "PFE", "KO", "PEP", "AVGO", "COST", "CSCO",
    "ADBE", "PLTR", "NFLX", "TXN", "AMAT", "INTC", "QCOM", "HON", "ORCL", "INTU", "MCD", "DIS",
    "CRM", "ABBV", "ACN", "LIN", "DHR", "NEE", "UPS", "TMO", "LOW", "UNP", "IBM", "RTX", "BA",
    "CAT", "MS", "GS", "BLK", "AMD", "CEG", "VST", "HCC", "MPC", "PM", "MO", "TDW", "VAL", "NE",
    "SLDP", "SHOP", "HSY", "RGTI", "LUNR", "FERG", "COIN", "HOOD", "TEM", "MU", "MARA",
];

pub const DEFAULT_ALERT_KEYWORDS: &[&str] = &[
    "orb_bull",
    "orb_bear",
    "volume_scan",
    "A+Bull_30m",
    "tmo_long",
    "tmo_Short",
    "Long_IT_volume",
    "Short_IT_volume",
    "bull_Daily_sqz",
    "bear_Daily_sqz",
];

pub const DEFAULT_ALERT_SENDER: &str = "alerts@thinkorswim.com";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Get the current environment name (`production`, `sandbox`, ...)
pub fn get_environment() -> String {
    std::env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// IMAP account used by the alert scanner
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub lookback_days: i64,
}

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub symbols: Vec<String>,
    pub timeframes: Vec<Interval>,
    /// Timeframe whose state changes are persisted and announced
    pub transition_timeframe: Interval,
    pub tmo: TmoParams,
    pub fetch_concurrency: usize,
    pub http_timeout: Duration,
    pub yahoo_base_url: String,
    pub mail: Option<MailConfig>,
    pub alert_keywords: Vec<String>,
    pub dedup_policy: DedupPolicy,
    pub webhook_url: Option<String>,
    pub state_file: PathBuf,
    pub scan_interval_seconds: u64,
    pub ignore_market_hours: bool,
    /// Exchange per-series option volume files
    pub volume_urls: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            timeframes: vec![Interval::Minutes60, Interval::Day1, Interval::Week1],
            transition_timeframe: Interval::Day1,
            tmo: TmoParams::default(),
            fetch_concurrency: 8,
            http_timeout: Duration::from_secs(10),
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            mail: None,
            alert_keywords: DEFAULT_ALERT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            dedup_policy: DedupPolicy::default(),
            webhook_url: None,
            state_file: PathBuf::from("last_signals.json"),
            scan_interval_seconds: 600,
            ignore_market_hours: false,
            volume_urls: DEFAULT_VOLUME_URLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScannerConfig {
    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let symbols = match get("SYMBOLS") {
            Some(raw) => split_list(&raw)
                .into_iter()
                .map(|s| s.to_uppercase())
                .collect(),
            None => defaults.symbols,
        };

        let timeframes = match get("TIMEFRAMES") {
            Some(raw) => split_list(&raw)
                .iter()
                .map(|s| parse_value::<Interval>("TIMEFRAMES", s))
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.timeframes,
        };

        let transition_timeframe = match get("TRANSITION_TIMEFRAME") {
            Some(raw) => parse_value::<Interval>("TRANSITION_TIMEFRAME", &raw)?,
            None => defaults.transition_timeframe,
        };

        let tmo = TmoParams {
            length: parse_or(&get, "TMO_LENGTH", defaults.tmo.length)?,
            calc_length: parse_or(&get, "TMO_CALC_LENGTH", defaults.tmo.calc_length)?,
            smooth_length: parse_or(&get, "TMO_SMOOTH_LENGTH", defaults.tmo.smooth_length)?,
        };
        if tmo.length == 0 || tmo.calc_length == 0 || tmo.smooth_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "TMO_*".to_string(),
                value: format!("{:?}", tmo),
            });
        }

        let fetch_concurrency: usize =
            parse_or(&get, "FETCH_CONCURRENCY", defaults.fetch_concurrency)?;
        let timeout_secs: u64 = parse_or(&get, "HTTP_TIMEOUT_SECONDS", 10)?;

        let mail = match (get("EMAIL_ADDRESS"), get("EMAIL_PASSWORD")) {
            (Some(username), Some(password)) => Some(MailConfig {
                host: get("IMAP_HOST").unwrap_or_else(|| "imap.gmail.com".to_string()),
                port: parse_or(&get, "IMAP_PORT", 993)?,
                username,
                password,
                sender: get("ALERT_SENDER").unwrap_or_else(|| DEFAULT_ALERT_SENDER.to_string()),
                lookback_days: parse_or(&get, "ALERT_LOOKBACK_DAYS", 2)?,
            }),
            _ => None,
        };

        let alert_keywords = match get("ALERT_KEYWORDS") {
            Some(raw) => split_list(&raw),
            None => defaults.alert_keywords,
        };

        let dedup_policy = match get("DEDUP_POLICY") {
            Some(raw) => parse_value::<DedupPolicy>("DEDUP_POLICY", &raw)?,
            None => defaults.dedup_policy,
        };

        let ignore_market_hours = match get("IGNORE_MARKET_HOURS") {
            Some(raw) => parse_bool("IGNORE_MARKET_HOURS", &raw)?,
            None => false,
        };

        let volume_urls = match get("CBOE_VOLUME_URLS") {
            Some(raw) => split_list(&raw),
            None => defaults.volume_urls,
        };

        Ok(Self {
            symbols,
            timeframes,
            transition_timeframe,
            tmo,
            fetch_concurrency: fetch_concurrency.max(1),
            http_timeout: Duration::from_secs(timeout_secs.max(1)),
            yahoo_base_url: get("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            mail,
            alert_keywords,
            dedup_policy,
            webhook_url: get("DISCORD_WEBHOOK_URL"),
            state_file: get("STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),
            scan_interval_seconds: parse_or(
                &get,
                "SCAN_INTERVAL_SECONDS",
                defaults.scan_interval_seconds,
            )?,
            ignore_market_hours,
            volume_urls,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
