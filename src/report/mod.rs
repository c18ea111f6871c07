//! Markdown tables for the terminal and webhook messages

pub mod flows;

pub use flows::{flow_newsletter, flow_summary_table, money, FlowSort, NewsletterOptions};

use crate::models::alert::AlertRecord;
use crate::models::indicators::Interval;
use crate::models::signal::{SignalChange, SymbolReport};
use std::collections::HashMap;

const MISSING: &str = "-";

fn price_cell(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| MISSING.to_string())
}

fn row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

fn header(columns: &[String]) -> String {
    let separator: Vec<String> = columns.iter().map(|_| "---".to_string()).collect();
    format!("{}\n{}", row(columns), row(&separator))
}

/// One row per symbol: price, a column per timeframe, then the daily levels
pub fn signal_table(reports: &[SymbolReport], timeframes: &[Interval]) -> String {
    let mut columns = vec!["Symbol".to_string(), "Price".to_string()];
    columns.extend(timeframes.iter().map(|i| i.to_string()));
    columns.extend(
        ["EMA 21", "EMA 50", "EMA 200", "Monthly Pivot"]
            .iter()
            .map(|s| s.to_string()),
    );

    let mut lines = vec![header(&columns)];
    for report in reports {
        let mut cells = vec![report.symbol.clone(), price_cell(report.price)];
        cells.extend(timeframes.iter().map(|&interval| {
            report
                .reading(interval)
                .map(|r| r.to_string())
                .unwrap_or_else(|| MISSING.to_string())
        }));
        cells.push(price_cell(report.ema_21));
        cells.push(price_cell(report.ema_50));
        cells.push(price_cell(report.ema_200));
        cells.push(price_cell(report.monthly_pivot));
        lines.push(row(&cells));
    }
    lines.join("\n")
}

/// Alert rows with the latest known price for each ticker
pub fn alert_table(rows: &[AlertRecord], prices: &HashMap<String, f64>) -> String {
    let columns: Vec<String> = ["Ticker", "Date", "Signal", "Latest Price"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut lines = vec![header(&columns)];
    for record in rows {
        lines.push(row(&[
            record.ticker.clone(),
            record.date.format("%Y-%m-%d").to_string(),
            record.keyword.clone(),
            price_cell(prices.get(&record.ticker).copied()),
        ]));
    }
    lines.join("\n")
}

/// One line per change, as posted to the webhook
pub fn change_message(changes: &[SignalChange]) -> String {
    changes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
