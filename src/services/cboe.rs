//! Exchange per-series option volume downloads

use crate::flows::load_volume_csv;
use crate::models::flow::VolumeRecord;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_VOLUME_URLS: &[&str] = &[
    "https://www.cboe.com/us/options/market_statistics/symbol_data/csv/?mkt=cone",
    "https://www.cboe.com/us/options/market_statistics/symbol_data/csv/?mkt=opt",
    "https://www.cboe.com/us/options/market_statistics/symbol_data/csv/?mkt=ctwo",
    "https://www.cboe.com/us/options/market_statistics/symbol_data/csv/?mkt=exo",
];

pub struct CboeVolumeClient {
    urls: Vec<String>,
    client: reqwest::Client,
}

impl CboeVolumeClient {
    pub fn new(urls: Vec<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(urls, client))
    }

    pub fn with_client(urls: Vec<String>, client: reqwest::Client) -> Self {
        Self { urls, client }
    }

    /// Records from every market file, in URL order.
    ///
    /// A file that cannot be fetched, is not served as CSV or cannot be read
    /// is skipped with a warning; the others are still returned.
    pub async fn fetch(&self, today: NaiveDate) -> Vec<VolumeRecord> {
        let mut all = Vec::new();
        for url in &self.urls {
            match self.fetch_one(url, today).await {
                Ok(records) => {
                    debug!(url = %url, count = records.len(), "Fetched volume file");
                    all.extend(records);
                }
                Err(reason) => warn!(url = %url, reason = %reason, "Skipping volume file"),
            }
        }
        all
    }

    async fn fetch_one(&self, url: &str, today: NaiveDate) -> Result<Vec<VolumeRecord>, String> {
        let response = self.client.get(url).send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("status {}", status.as_u16()));
        }

        let is_csv = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |v| v.contains("text/csv"));
        if !is_csv {
            return Err("response is not CSV".to_string());
        }

        let body = response.text().await.map_err(|e| e.to_string())?;
        load_volume_csv(body.as_bytes(), today).map_err(|e| e.to_string())
    }
}
