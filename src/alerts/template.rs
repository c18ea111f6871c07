//! The alert sentence: `New symbols: <tickers> were added to <keyword>`

use regex::Regex;

pub struct AlertTemplate {
    keyword: String,
    pattern: Regex,
}

impl AlertTemplate {
    pub fn new(keyword: &str) -> Result<Self, regex::Error> {
        // the keyword must end at a non-word character so `tmo_long` does not
        // also match `tmo_long_v2`
        let pattern = Regex::new(&format!(
            r"New symbols:\s*([A-Z0-9.,\s]+?)\s*were added to\s*({})(?:\W|$)",
            regex::escape(keyword)
        ))?;
        Ok(Self {
            keyword: keyword.to_string(),
            pattern,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Tickers announced in `text`, across every match, in order of
    /// appearance. Tickers may be separated by commas, whitespace or both.
    pub fn tickers(&self, text: &str) -> Vec<String> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .flat_map(|group| {
                group
                    .as_str()
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .map(|t| t.trim_matches('.'))
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
