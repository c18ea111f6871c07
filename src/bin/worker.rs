//! Signaldesk Worker
//!
//! Runs the scan cycle on a cron schedule during market hours: momentum scan,
//! transition notifications, email alert extraction.

use dotenvy::dotenv;
use signaldesk::alerts::{AlertExtractor, AlertScanner, ImapMailSource};
use signaldesk::config::ScannerConfig;
use signaldesk::core::runtime::{CycleSettings, ScanCycle};
use signaldesk::core::scheduler::ScanScheduler;
use signaldesk::logging;
use signaldesk::metrics::Metrics;
use signaldesk::services::{MarketDataProvider, SignalStateStore, WebhookNotifier, YahooFinanceProvider};
use signaldesk::signals::Scanner;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = ScannerConfig::from_env()?;
    let env = signaldesk::config::get_environment();
    info!("Starting Signaldesk Worker");
    info!(environment = %env, "Environment");
    info!(
        symbols = config.symbols.len(),
        interval = config.scan_interval_seconds,
        "Scanning {} symbols every {} seconds",
        config.symbols.len(),
        config.scan_interval_seconds
    );

    let metrics = Arc::new(Metrics::new()?);
    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooFinanceProvider::new(
        config.yahoo_base_url.clone(),
        config.http_timeout,
    )?);

    let scanner = Scanner::new(provider.clone(), config.tmo)
        .with_concurrency(config.fetch_concurrency)
        .with_levels(true)
        .with_metrics(metrics.clone());

    let settings = CycleSettings {
        symbols: config.symbols.clone(),
        timeframes: config.timeframes.clone(),
        transition_timeframe: config.transition_timeframe,
        alert_keywords: config.alert_keywords.clone(),
        dedup_policy: config.dedup_policy,
        ignore_market_hours: config.ignore_market_hours,
    };
    let mut cycle = ScanCycle::new(
        settings,
        provider,
        scanner,
        SignalStateStore::new(config.state_file.clone()),
    );

    match config.mail.clone() {
        Some(mail) => {
            let sender = mail.sender.clone();
            let lookback_days = mail.lookback_days;
            let source = Arc::new(ImapMailSource::new(mail, config.http_timeout));
            cycle = cycle.with_alert_scanner(
                AlertScanner::new(
                    source,
                    AlertExtractor::new(config.dedup_policy),
                    sender,
                    lookback_days,
                )
                .with_metrics(metrics.clone()),
            );
        }
        None => warn!("EMAIL_ADDRESS/EMAIL_PASSWORD not set, alert scanning disabled"),
    }

    match config.webhook_url.clone() {
        Some(url) => {
            let notifier = WebhookNotifier::new(url, config.http_timeout)?.with_metrics(metrics.clone());
            cycle = cycle.with_notifier(notifier);
        }
        None => warn!("DISCORD_WEBHOOK_URL not set, notifications disabled"),
    }

    let scheduler = ScanScheduler::new(Arc::new(cycle), config.scan_interval_seconds)?;
    scheduler.start().await;

    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;

    info!("Shutting down worker...");
    scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
