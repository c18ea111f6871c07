//! One-shot runs.
//!
//! - `signaldesk`: prints the signal table, and alert tables when a mailbox
//!   is configured
//! - `signaldesk flows <export.csv>`: scores a flow export and prints the
//!   newsletter
//! - `signaldesk volume <SYMBOL> [C|P] [YYYY-MM-DD]`: sums today's exchange
//!   volume per series
//!
//! Pass `--notify` to also post the output to the configured webhook.

use dotenvy::dotenv;
use signaldesk::alerts::{AlertExtractor, AlertScanner, ImapMailSource, ProcessedCursor};
use signaldesk::config::ScannerConfig;
use signaldesk::core::market_hours::market_date;
use signaldesk::flows::{enrich_flows, load_flow_csv, summarize_flows};
use signaldesk::logging;
use signaldesk::models::flow::OptionSide;
use signaldesk::report::{self, NewsletterOptions};
use signaldesk::services::{
    CboeVolumeClient, MarketDataProvider, WebhookNotifier, YahooFinanceProvider,
};
use signaldesk::signals::Scanner;
use std::collections::HashMap;
use std::fs::File;
use std::sync::Arc;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult {
    dotenv().ok();
    logging::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let notify = args.iter().any(|arg| arg == "--notify");
    let positional: Vec<&str> = args
        .iter()
        .filter(|arg| !arg.starts_with("--"))
        .map(String::as_str)
        .collect();

    let config = ScannerConfig::from_env()?;
    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooFinanceProvider::new(
        config.yahoo_base_url.clone(),
        config.http_timeout,
    )?);
    let notifier = match (&config.webhook_url, notify) {
        (Some(url), true) => Some(WebhookNotifier::new(url.clone(), config.http_timeout)?),
        _ => None,
    };

    match positional.as_slice() {
        ["flows", path, ..] => run_flows(path, provider, notifier).await,
        ["volume", symbol, rest @ ..] => run_volume(&config, symbol, rest, notifier).await,
        _ => run_scan(&config, provider, notifier).await,
    }
}

async fn run_flows(
    path: &str,
    provider: Arc<dyn MarketDataProvider>,
    notifier: Option<WebhookNotifier>,
) -> CliResult {
    let mut flows = load_flow_csv(File::open(path)?)?;
    enrich_flows(&mut flows, provider.as_ref()).await;

    let today = market_date(chrono::Utc::now());
    let newsletter = report::flow_newsletter(&flows, &NewsletterOptions::default(), today);
    println!("{}", newsletter);

    if let Some(ref notifier) = notifier {
        notifier.notify("Options flow newsletter", Some(&newsletter)).await;
    }
    Ok(())
}

async fn run_volume(
    config: &ScannerConfig,
    symbol: &str,
    filters: &[&str],
    notifier: Option<WebhookNotifier>,
) -> CliResult {
    let side = filters.iter().find_map(|f| f.parse::<OptionSide>().ok());
    let expiration = filters
        .iter()
        .find_map(|f| chrono::NaiveDate::parse_from_str(f, "%Y-%m-%d").ok());

    let today = market_date(chrono::Utc::now());
    let client = CboeVolumeClient::new(config.volume_urls.clone(), config.http_timeout)?;
    let records = client.fetch(today).await;

    let symbol = symbol.to_uppercase();
    let summaries = summarize_flows(&records, &symbol, side, expiration);
    let table = report::flow_summary_table(&summaries);
    println!("{}", table);

    if let Some(ref notifier) = notifier {
        let title = format!("Option volume for {}", symbol);
        notifier.notify(&title, Some(&table)).await;
    }
    Ok(())
}

async fn run_scan(
    config: &ScannerConfig,
    provider: Arc<dyn MarketDataProvider>,
    notifier: Option<WebhookNotifier>,
) -> CliResult {
    let scanner = Scanner::new(provider.clone(), config.tmo)
        .with_concurrency(config.fetch_concurrency)
        .with_levels(true);
    let reports = scanner.scan(&config.symbols, &config.timeframes).await;
    let table = report::signal_table(&reports, &config.timeframes);
    println!("{}\n", table);

    if let Some(ref notifier) = notifier {
        notifier.notify("Momentum scan", Some(&table)).await;
    }

    let Some(mail) = config.mail.clone() else {
        return Ok(());
    };

    let sender = mail.sender.clone();
    let lookback_days = mail.lookback_days;
    let alert_scanner = AlertScanner::new(
        Arc::new(ImapMailSource::new(mail, config.http_timeout)),
        AlertExtractor::new(config.dedup_policy),
        sender,
        lookback_days,
    );

    let today = market_date(chrono::Utc::now());
    let mut cursor = ProcessedCursor::new();
    let mut prices: HashMap<String, f64> = HashMap::new();

    for keyword in &config.alert_keywords {
        let extraction = alert_scanner.scan(keyword, today, cursor).await;
        cursor = extraction.cursor;
        if extraction.records.is_empty() {
            continue;
        }

        for record in &extraction.records {
            if !prices.contains_key(&record.ticker) {
                if let Ok(price) = provider.get_latest_price(&record.ticker).await {
                    prices.insert(record.ticker.clone(), price);
                }
            }
        }

        let table = report::alert_table(&extraction.records, &prices);
        println!("## {}\n\n{}\n", keyword, table);
        if let Some(ref notifier) = notifier {
            notifier.notify(keyword, Some(&table)).await;
        }
    }

    Ok(())
}
