//! Error types shared across the crate

use serde::Serialize;
use thiserror::Error;

/// Failures talking to a market data provider.
///
/// Callers never surface these to the user as crashes: the scanner turns every
/// variant into a "No Data" reading for the affected symbol/timeframe.
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status} for {symbol}")]
    Status { symbol: String, status: u16 },

    #[error("Provider error for {symbol}: {message}")]
    Provider { symbol: String, message: String },

    #[error("Malformed provider payload: {0}")]
    Payload(String),

    #[error("No data for {0}")]
    NoData(String),
}

impl MarketDataError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            MarketDataError::Http(e) => e.is_timeout() || e.is_connect(),
            MarketDataError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Failures reaching or reading the mail source.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mail connection error: {0}")]
    Connection(String),

    #[error("Mail login failed: {0}")]
    Login(String),

    #[error("IMAP error: {0}")]
    Imap(#[from] imap::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mail task failed: {0}")]
    Task(String),
}

/// Failures reading or writing the persisted signal snapshot.
#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures reading options flow files.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Serializable error body for the HTTP layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<&MarketDataError> for ErrorResponse {
    fn from(err: &MarketDataError) -> Self {
        let code = match err {
            MarketDataError::Http(_) => "HTTP_ERROR",
            MarketDataError::Status { .. } => "PROVIDER_STATUS",
            MarketDataError::Provider { .. } => "PROVIDER_ERROR",
            MarketDataError::Payload(_) => "PAYLOAD_ERROR",
            MarketDataError::NoData(_) => "NO_DATA",
        };
        ErrorResponse::new(code, err.to_string())
    }
}
