//! Options flow summary table and newsletter

use super::{header, row};
use crate::flows::{
    best_plays, detect_repeat_flows, identify_unusual_volume, is_index_ticker, DEFAULT_MAX_DAYS,
    DEFAULT_MIN_SCORE,
};
use crate::models::flow::{FlowSummary, OptionFlow, OptionSide};
use chrono::{Duration, NaiveDate};
use std::fmt::Write;
use std::str::FromStr;

const PATTERN_LINES: usize = 5;
const MARKET_TICKERS: &[&str] = &["SPY", "QQQ"];
const MARKET_WINDOW_DAYS: i64 = 7;

/// Per-series volume, largest first
pub fn flow_summary_table(summaries: &[FlowSummary]) -> String {
    let columns: Vec<String> = ["Symbol", "Expiration", "Strike", "Call/Put", "Last Price", "Volume"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut lines = vec![header(&columns)];
    for s in summaries {
        lines.push(row(&[
            s.symbol.clone(),
            s.expiration.format("%Y-%m-%d").to_string(),
            format!("{:.2}", s.strike),
            s.side.to_string(),
            format!("{:.2}", s.last_price),
            s.volume.to_string(),
        ]));
    }
    lines.join("\n")
}

/// Ordering of the newsletter's flow list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowSort {
    #[default]
    Score,
    Premium,
    Ticker,
}

impl FromStr for FlowSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" | "flow score" => Ok(FlowSort::Score),
            "premium" | "premium price" => Ok(FlowSort::Premium),
            "ticker" => Ok(FlowSort::Ticker),
            other => Err(format!("unknown flow sort '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewsletterOptions {
    /// Flows listed in the closing section
    pub top_n: usize,
    pub min_premium: f64,
    pub side_codes: Vec<String>,
    /// Restrict the closing section to these tickers; all when `None`
    pub tickers: Option<Vec<String>>,
    pub sort_by: FlowSort,
    pub include_scores: bool,
}

impl Default for NewsletterOptions {
    fn default() -> Self {
        Self {
            top_n: 50,
            min_premium: 100_000.0,
            side_codes: vec!["AA".to_string(), "BB".to_string()],
            tickers: None,
            sort_by: FlowSort::Score,
            include_scores: true,
        }
    }
}

/// `1234567.5` as `1,234,567.50`
pub fn money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let digits: Vec<char> = whole.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

/// Buying calls or selling puts reads bullish, the reverse bearish
fn flow_bias(flow: &OptionFlow) -> &'static str {
    let code = flow.side_code.as_deref();
    let at_ask = matches!(code, Some("A") | Some("AA"));
    let at_bid = matches!(code, Some("B") | Some("BB"));
    match (flow.side, at_ask, at_bid) {
        (OptionSide::Call, true, _) | (OptionSide::Put, _, true) => "bullish",
        (OptionSide::Call, _, true) | (OptionSide::Put, true, _) => "bearish",
        _ => "N/A",
    }
}

fn flow_line(flow: &OptionFlow, include_score: bool, include_rsi: bool) -> String {
    let mut flags = Vec::new();
    if flow.is_unusual {
        flags.push("UNUSUAL");
    }
    if flow.is_golden_sweep {
        flags.push("GOLDEN SWEEP");
    }

    let mut line = format!(
        "- {} {} ${} exp {} - ${} ({} contracts, {:.1}% move, {}, {})",
        flow.ticker,
        flow.side,
        money(flow.strike),
        flow.expiration.format("%Y-%m-%d"),
        money(flow.premium),
        flow.size,
        flow.move_pct(),
        flow_bias(flow),
        flow.side_code.as_deref().unwrap_or("N/A"),
    );
    if !flags.is_empty() {
        let _ = write!(line, " [{}]", flags.join(" "));
    }
    if include_score {
        let _ = write!(line, " [Score: {:.1}]", flow.score);
    }
    if include_rsi {
        if let Some(rsi) = flow.rsi {
            let _ = write!(line, " [RSI: {:.1}]", rsi);
        }
    }
    line
}

fn market_section(flows: &[OptionFlow], today: NaiveDate, out: &mut String) {
    out.push_str("=== MARKET UPDATE (OTM FLOWS) ===\n");
    let market: Vec<&OptionFlow> = flows
        .iter()
        .filter(|f| MARKET_TICKERS.contains(&f.ticker.as_str()))
        .collect();
    if market.is_empty() {
        out.push_str("No OTM market index flows detected.\n\n");
        return;
    }

    let horizon = today + Duration::days(MARKET_WINDOW_DAYS);
    let near: Vec<&OptionFlow> = market
        .into_iter()
        .filter(|f| f.expiration > today && f.expiration <= horizon)
        .collect();
    if near.is_empty() {
        out.push_str("No near-term OTM flows for SPY/QQQ.\n\n");
        return;
    }

    let premium_of = |side: OptionSide| -> f64 {
        near.iter().filter(|f| f.side == side).map(|f| f.premium).sum()
    };
    let call = premium_of(OptionSide::Call);
    let put = premium_of(OptionSide::Put);
    let contracts: u64 = near.iter().map(|f| f.size).sum();
    let ratio = if call > 0.0 { put / call } else { f64::INFINITY };
    let sentiment = if ratio < 0.7 {
        "BULLISH"
    } else if ratio > 1.5 {
        "BEARISH"
    } else {
        "NEUTRAL"
    };

    let _ = write!(
        out,
        "Market Sentiment: {}\nTotal Premium: ${}\nTotal Contracts: {}\nPut/Call Ratio: {:.2}\n\n",
        sentiment,
        money(call + put),
        contracts,
        ratio
    );
}

/// Plain-text daily summary of out-of-the-money flows.
///
/// Sections: SPY/QQQ sentiment over the coming week, high conviction plays,
/// unusual volume, repeat flows, then the filtered flow list.
pub fn flow_newsletter(flows: &[OptionFlow], options: &NewsletterOptions, today: NaiveDate) -> String {
    let mut out = format!(
        "OUT-THE-MONEY OPTIONS FLOW SUMMARY - {}\n\n",
        today.format("%b %d, %Y")
    );

    market_section(flows, today, &mut out);

    out.push_str("=== HIGH CONVICTION PLAYS ===\n");
    let plays = best_plays(flows, DEFAULT_MIN_SCORE, DEFAULT_MAX_DAYS);
    if plays.is_empty() {
        out.push_str("No high conviction plays detected.\n");
    }
    for flow in &plays {
        out.push_str(&flow_line(flow, options.include_scores, true));
        out.push('\n');
    }
    out.push('\n');

    let unusual = identify_unusual_volume(flows);
    if !unusual.is_empty() {
        out.push_str("=== UNUSUAL VOLUME PATTERNS ===\n");
        for p in unusual.iter().take(PATTERN_LINES) {
            let _ = writeln!(
                out,
                "- {}: Strong {} bias ({:.1}:1), ${}, {} flows",
                p.ticker,
                p.direction,
                p.ratio,
                money(p.total_premium),
                p.flow_count
            );
        }
        out.push('\n');
    }

    let repeats = detect_repeat_flows(flows);
    if !repeats.is_empty() {
        out.push_str("=== REPEAT FLOW PATTERNS ===\n");
        for p in repeats.iter().take(PATTERN_LINES) {
            let _ = writeln!(
                out,
                "- {}: {} {} flows, ${}, avg score: {:.1}",
                p.ticker,
                p.flow_count,
                p.direction,
                money(p.total_premium),
                p.avg_score
            );
        }
        out.push('\n');
    }

    out.push_str("=== OTM FLOWS ===\n");
    let mut listed: Vec<&OptionFlow> = flows
        .iter()
        .filter(|f| {
            f.expiration > today
                && f.premium >= options.min_premium
                && f.side_code
                    .as_ref()
                    .map_or(false, |c| options.side_codes.contains(c))
                && options
                    .tickers
                    .as_ref()
                    .map_or(true, |t| t.contains(&f.ticker))
                && !is_index_ticker(&f.ticker)
        })
        .collect();
    listed.sort_by(|a, b| {
        let primary = match options.sort_by {
            FlowSort::Score => b.score.total_cmp(&a.score),
            FlowSort::Premium => b.premium.total_cmp(&a.premium),
            FlowSort::Ticker => b.ticker.cmp(&a.ticker),
        };
        primary.then_with(|| a.ticker.cmp(&b.ticker))
    });

    if listed.is_empty() {
        out.push_str("No aggressive OTM flows detected.\n\n");
    } else {
        for flow in listed.iter().take(options.top_n) {
            out.push_str(&flow_line(flow, options.include_scores, false));
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str("Only for educational purposes!");
    out
}
