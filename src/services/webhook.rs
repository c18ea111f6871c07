//! Best-effort webhook notifications (Discord-compatible)

use crate::metrics::Metrics;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Discord rejects message content longer than this many characters
pub const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Build the message body: the text, then the table in a code block, cut to
/// [`MAX_CONTENT_CHARS`] characters.
pub fn build_content(message: &str, table: Option<&str>) -> String {
    let mut content = message.to_string();
    if let Some(table) = table {
        content.push_str("\n\n```\n");
        content.push_str(table);
        content.push_str("\n```");
    }
    truncate_chars(&content, MAX_CONTENT_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Fire-and-forget poster. Failures are logged and counted, never retried.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
    metrics: Option<Arc<Metrics>>,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Post `message`, optionally followed by a preformatted table.
    ///
    /// Returns whether the webhook accepted the payload.
    pub async fn notify(&self, message: &str, table: Option<&str>) -> bool {
        let content = build_content(message, table);
        let payload = WebhookPayload { content: &content };

        let result = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(response) => {
                debug!(status = %response.status(), chars = content.chars().count(), "Webhook delivered");
                true
            }
            Err(e) => {
                warn!(error = %e, "Webhook delivery failed");
                if let Some(ref metrics) = self.metrics {
                    metrics.webhook_failures_total.inc();
                }
                false
            }
        }
    }
}
