//! Trade-level flow exports

use super::{parse_count, parse_date, parse_number};
use crate::error::FlowError;
use crate::models::flow::{OptionFlow, OptionSide};
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, warn};

/// Column layout of exports that arrive without usable headers
pub const FLOW_COLUMNS: &[&str] = &[
    "Trade ID",
    "Trade Time",
    "Ticker",
    "Expiration Date",
    "Days Until Expiration",
    "Strike Price",
    "Contract Type",
    "Reference Price",
    "Size",
    "Option Price",
    "Ask Price",
    "Bid Price",
    "Premium Price",
    "Trade Type",
    "Consolidation Type",
    "Is Unusual",
    "Is Golden Sweep",
    "Is Opening Position",
    "Money Type",
];

const NAMED_COLUMNS: &[&str] = &["Ticker", "Expiration Date", "Contract Type"];
const OUT_THE_MONEY: &str = "OUT_THE_MONEY";

/// Column name to position
struct Columns(HashMap<String, usize>);

impl Columns {
    /// Use the header row when it names the key columns, otherwise fall back to
    /// [`FLOW_COLUMNS`] by position. Extra named columns such as `Side Code`
    /// are kept either way.
    fn resolve(headers: &csv::StringRecord) -> Self {
        let named: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();

        if NAMED_COLUMNS.iter().all(|c| named.contains_key(*c)) {
            return Columns(named);
        }

        let mut positional = named;
        for (i, name) in FLOW_COLUMNS.iter().enumerate() {
            if i < headers.len() {
                positional.insert(name.to_string(), i);
            }
        }
        Columns(positional)
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, name: &str) -> Option<&'r str> {
        self.0
            .get(name)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn flag(&self, record: &csv::StringRecord, name: &str) -> bool {
        self.get(record, name)
            .map_or(false, |v| v.eq_ignore_ascii_case("yes"))
    }

    fn parse(&self, record: &csv::StringRecord) -> Option<OptionFlow> {
        let reference_price = parse_number(self.get(record, "Reference Price")?)?;
        if reference_price <= 0.0 {
            return None;
        }

        Some(OptionFlow {
            ticker: self.get(record, "Ticker")?.to_uppercase(),
            expiration: parse_date(self.get(record, "Expiration Date")?)?,
            days_to_expiration: parse_number(self.get(record, "Days Until Expiration")?)?
                .round() as i64,
            strike: parse_number(self.get(record, "Strike Price")?)?,
            side: self.get(record, "Contract Type")?.parse::<OptionSide>().ok()?,
            reference_price,
            size: parse_count(self.get(record, "Size")?)?,
            option_price: self.get(record, "Option Price").and_then(parse_number),
            premium: parse_number(self.get(record, "Premium Price")?)?,
            side_code: self
                .get(record, "Side Code")
                .map(|s| s.to_uppercase())
                .filter(|s| s != "N/A"),
            is_unusual: self.flag(record, "Is Unusual"),
            is_golden_sweep: self.flag(record, "Is Golden Sweep"),
            is_opening: self.flag(record, "Is Opening Position"),
            money_type: self.get(record, "Money Type").unwrap_or_default().to_string(),
            rsi: None,
            change_5d: None,
            score: 0.0,
        })
    }
}

/// Read a flow export, keeping out-of-the-money opening trades.
///
/// Scores are left at zero; see [`crate::flows::score_flows`]. Rows with a
/// missing or unreadable required field are skipped with a warning.
pub fn load_flow_csv<R: Read>(reader: R) -> Result<Vec<OptionFlow>, FlowError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = Columns::resolve(&headers);

    if !columns.0.contains_key("Premium Price") {
        return Err(FlowError::MissingColumn("Premium Price".to_string()));
    }

    let mut flows = Vec::new();
    let mut skipped = 0usize;
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        match columns.parse(&record) {
            Some(flow) if flow.money_type == OUT_THE_MONEY && flow.is_opening => flows.push(flow),
            Some(_) => {}
            None => {
                skipped += 1;
                debug!(line = line + 2, "Unreadable flow row");
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = flows.len(), "Skipped unreadable flow rows");
    }
    Ok(flows)
}
