//! Mail sources the alert scanner reads from

use crate::config::MailConfig;
use crate::error::MailError;
use crate::models::alert::RawMessage;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, warn};

/// Search filter: who sent it, what the subject mentions, how far back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailQuery {
    pub sender: String,
    pub subject_keyword: String,
    pub since: NaiveDate,
}

impl MailQuery {
    pub fn new(sender: &str, subject_keyword: &str, since: NaiveDate) -> Self {
        Self {
            sender: sender.to_string(),
            subject_keyword: subject_keyword.to_string(),
            since,
        }
    }

    /// IMAP SEARCH criteria for this query
    pub fn to_imap_criteria(&self) -> String {
        format!(
            "FROM {} SUBJECT {} SINCE {}",
            quote(&self.sender),
            quote(&self.subject_keyword),
            self.since.format("%d-%b-%Y")
        )
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[async_trait]
pub trait MailSource: Send + Sync {
    /// Raw messages matching `query`
    async fn search(&self, query: &MailQuery) -> Result<Vec<RawMessage>, MailError>;
}

/// IMAP-over-TLS mailbox.
///
/// The `imap` client is blocking, so each search runs on the blocking pool
/// with socket-level connect, read and write timeouts.
pub struct ImapMailSource {
    config: MailConfig,
    timeout: Duration,
}

impl ImapMailSource {
    pub fn new(config: MailConfig, timeout: Duration) -> Self {
        Self { config, timeout }
    }
}

#[async_trait]
impl MailSource for ImapMailSource {
    async fn search(&self, query: &MailQuery) -> Result<Vec<RawMessage>, MailError> {
        let config = self.config.clone();
        let timeout = self.timeout;
        let criteria = query.to_imap_criteria();

        tokio::task::spawn_blocking(move || search_blocking(&config, &criteria, timeout))
            .await
            .map_err(|e| MailError::Task(e.to_string()))?
    }
}

fn search_blocking(
    config: &MailConfig,
    criteria: &str,
    timeout: Duration,
) -> Result<Vec<RawMessage>, MailError> {
    let addr = (config.host.as_str(), config.port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| MailError::Connection(format!("cannot resolve {}", config.host)))?;

    let tcp = TcpStream::connect_timeout(&addr, timeout)?;
    tcp.set_read_timeout(Some(timeout))?;
    tcp.set_write_timeout(Some(timeout))?;

    let tls = native_tls::TlsConnector::new().map_err(|e| MailError::Connection(e.to_string()))?;
    let stream = tls
        .connect(&config.host, tcp)
        .map_err(|e| MailError::Connection(e.to_string()))?;

    let mut client = imap::Client::new(stream);
    client.read_greeting()?;
    let mut session = client
        .login(&config.username, &config.password)
        .map_err(|(e, _)| MailError::Login(e.to_string()))?;

    session.select("INBOX")?;
    let mut uids: Vec<u32> = session.uid_search(criteria)?.into_iter().collect();
    uids.sort_unstable();
    debug!(criteria = %criteria, matches = uids.len(), "IMAP search complete");

    let mut messages = Vec::with_capacity(uids.len());
    if !uids.is_empty() {
        let set = uids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let fetches = session.uid_fetch(&set, "RFC822")?;
        for fetch in fetches.iter() {
            match (fetch.uid, fetch.body()) {
                (Some(uid), Some(body)) => {
                    messages.push(RawMessage::new(uid.to_string(), body.to_vec()))
                }
                _ => warn!(seq = fetch.message, "IMAP fetch without UID or body"),
            }
        }
    }

    if let Err(e) = session.logout() {
        debug!(error = %e, "IMAP logout failed");
    }

    Ok(messages)
}
