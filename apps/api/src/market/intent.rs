//! Intent parsing: turns the classifier model's prose reply into a tagged `Intent`.
//!
//! The reply format is only a convention requested in the prompt
//! (`Category: ..., Company: ..., Interval: ...`), so parsing sits behind the
//! `IntentParser` trait. A structured-output parser can replace `MarkerParser`
//! without touching the classifier or router.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Company names the assistant knows how to resolve to a ticker.
pub const COMPANY_TO_SYMBOL: [(&str, &str); 5] = [
    ("Apple", "AAPL"),
    ("Tesla", "TSLA"),
    ("Google", "GOOGL"),
    ("Amazon", "AMZN"),
    ("Microsoft", "MSFT"),
];

/// Resolves a company name through the fixed table. Exact match only.
pub fn lookup_symbol(company: &str) -> Option<&'static str> {
    COMPANY_TO_SYMBOL
        .iter()
        .find(|(name, _)| *name == company)
        .map(|(_, symbol)| *symbol)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartInterval {
    Daily,
    Weekly,
    Monthly,
}

impl ChartInterval {
    /// Case-insensitive label mapping. Anything that is not "daily" or
    /// "weekly" selects the monthly series.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "daily" => ChartInterval::Daily,
            "weekly" => ChartInterval::Weekly,
            _ => ChartInterval::Monthly,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartInterval::Daily => "Daily",
            ChartInterval::Weekly => "Weekly",
            ChartInterval::Monthly => "Monthly",
        }
    }

    /// Market-data API function for this interval.
    pub fn api_function(self) -> &'static str {
        match self {
            ChartInterval::Daily => "TIME_SERIES_DAILY",
            ChartInterval::Weekly => "TIME_SERIES_WEEKLY",
            ChartInterval::Monthly => "TIME_SERIES_MONTHLY",
        }
    }

    /// Top-level response key holding the series for this interval.
    pub fn series_key(self) -> &'static str {
        match self {
            ChartInterval::Daily => "Time Series (Daily)",
            ChartInterval::Weekly => "Weekly Time Series",
            ChartInterval::Monthly => "Monthly Time Series",
        }
    }
}

/// What the user asked for. Optional fields stay `None` when the model's reply
/// did not carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Intent {
    StockPrice {
        company: Option<String>,
        symbol: Option<String>,
    },
    StockChart {
        company: Option<String>,
        interval: Option<ChartInterval>,
        symbol: Option<String>,
    },
    General,
}

impl Intent {
    pub fn company(&self) -> Option<&str> {
        match self {
            Intent::StockPrice { company, .. } | Intent::StockChart { company, .. } => {
                company.as_deref()
            }
            Intent::General => None,
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        match self {
            Intent::StockPrice { symbol, .. } | Intent::StockChart { symbol, .. } => {
                symbol.as_deref()
            }
            Intent::General => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum IntentParseError {
    #[error("classifier reply was empty")]
    EmptyReply,
}

pub trait IntentParser: Send + Sync {
    fn parse(&self, reply: &str) -> Result<Intent, IntentParseError>;
}

/// Parses a reply, degrading any failure to `Intent::General`.
pub fn parse_or_general(parser: &dyn IntentParser, reply: &str) -> Intent {
    parser.parse(reply).unwrap_or_else(|e| {
        warn!("Error parsing LLM response: {e}");
        Intent::General
    })
}

/// Text-marker parser for replies shaped like
/// `Category: Stock Chart, Company: Tesla, Interval: Daily`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerParser;

const COMPANY_MARKER: &str = "Company:";
const INTERVAL_MARKER: &str = "Interval:";

impl IntentParser for MarkerParser {
    fn parse(&self, reply: &str) -> Result<Intent, IntentParseError> {
        if reply.trim().is_empty() {
            return Err(IntentParseError::EmptyReply);
        }

        if reply.contains("Stock Price") {
            let company = after_last(reply, COMPANY_MARKER).and_then(first_field);
            let symbol = resolve(company.as_deref());
            return Ok(Intent::StockPrice { company, symbol });
        }

        if reply.contains("Stock Chart") {
            let company = after_last(reply, COMPANY_MARKER).and_then(|rest| {
                let until_interval = rest.split(INTERVAL_MARKER).next().unwrap_or(rest);
                first_field(until_interval)
            });
            let interval = after_last(reply, INTERVAL_MARKER)
                .map(|rest| {
                    let line = rest.split([',', '\n']).next().unwrap_or(rest);
                    line.trim()
                        .trim_end_matches(|c: char| c.is_ascii_punctuation())
                })
                .filter(|label| !label.is_empty())
                .map(ChartInterval::from_label);
            let symbol = resolve(company.as_deref());
            return Ok(Intent::StockChart {
                company,
                interval,
                symbol,
            });
        }

        Ok(Intent::General)
    }
}

/// Text following the last occurrence of `marker`, if the marker is present.
fn after_last<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.rfind(marker).map(|idx| &text[idx + marker.len()..])
}

/// Text up to the first comma or line break, trimmed; `None` when that leaves nothing.
fn first_field(text: &str) -> Option<String> {
    let field = text.split([',', '\n']).next().unwrap_or(text).trim();
    (!field.is_empty()).then(|| field.to_string())
}

fn resolve(company: Option<&str>) -> Option<String> {
    company.and_then(lookup_symbol).map(String::from)
}
