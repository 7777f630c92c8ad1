//! Price Fetcher: current quote for one ticker, fetched fresh on every call.

use serde::Serialize;
use serde_json::Value;

use crate::market::data_client::{MarketDataClient, MarketError};

pub const QUOTE_FUNCTION: &str = "GLOBAL_QUOTE";
pub const QUOTE_NOT_FOUND: &str = "Could not fetch stock price. Please check the stock symbol.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "price", rename_all = "snake_case")]
pub enum QuoteOutcome {
    Price(String),
    NotFound,
}

impl QuoteOutcome {
    /// The price, or the fixed "could not fetch" text.
    pub fn display_value(&self) -> &str {
        match self {
            QuoteOutcome::Price(price) => price,
            QuoteOutcome::NotFound => QUOTE_NOT_FOUND,
        }
    }
}

pub async fn fetch_quote(
    client: &MarketDataClient,
    symbol: &str,
) -> Result<QuoteOutcome, MarketError> {
    let body = client.query(QUOTE_FUNCTION, symbol).await?;
    Ok(extract_price(&body))
}

/// Reads `["Global Quote"]["05. price"]`. Any other shape is `NotFound`.
pub fn extract_price(body: &Value) -> QuoteOutcome {
    match body.get("Global Quote").and_then(|q| q.get("05. price")) {
        Some(Value::String(price)) => QuoteOutcome::Price(price.clone()),
        Some(Value::Number(price)) => QuoteOutcome::Price(price.to_string()),
        _ => QuoteOutcome::NotFound,
    }
}
