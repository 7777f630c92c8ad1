use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed {field} in series entry {date}: {value}")]
    Malformed {
        date: String,
        field: &'static str,
        value: String,
    },
}

/// Thin client for the market-data query endpoint.
/// Every call is a single GET carrying `function`, `symbol` and `apikey`.
#[derive(Clone)]
pub struct MarketDataClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MarketDataClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, MarketError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Issues one query and returns the decoded JSON body, whatever its shape.
    pub async fn query(&self, function: &str, symbol: &str) -> Result<Value, MarketError> {
        debug!("market data request: function={function} symbol={symbol}");
        let body = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", function),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json::<Value>()
            .await?;
        Ok(body)
    }
}
