// Market-query assistant.
// Flow: classify (LLM) → route → price fetch | chart fetch | free-form answer.
// All LLM calls go through llm_client; all market data through data_client.

pub mod chart;
pub mod classifier;
pub mod data_client;
pub mod handlers;
pub mod intent;
pub mod prompts;
pub mod quote;
pub mod responder;
pub mod router;

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

pub use data_client::{MarketDataClient, MarketError};

use crate::errors::AppError;
use crate::llm_client::LanguageModel;
use chart::{fetch_chart, ChartOutcome};
use intent::{ChartInterval, Intent, IntentParser};
use quote::{fetch_quote, QuoteOutcome};
use router::{route, Route};

pub const CHART_NOT_FOUND: &str = "Could not fetch stock chart. Please try again.";
pub const UNRESOLVED_QUERY: &str =
    "Could not determine the category, company, or interval. Please refine your query.";

/// The routed result of one query, carrying the text the user should see.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryAnswer {
    Price {
        company: String,
        symbol: String,
        quote: QuoteOutcome,
        message: String,
    },
    Chart {
        company: String,
        symbol: String,
        interval: ChartInterval,
        title: String,
        chart: ChartOutcome,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    General {
        answer: String,
    },
    Unresolved {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub intent: Intent,
    pub answer: QueryAnswer,
}

/// Everything Pipeline A needs, built once at startup.
pub struct MarketDesk {
    pub llm: Arc<dyn LanguageModel>,
    pub data: MarketDataClient,
    pub parser: Arc<dyn IntentParser>,
}

impl MarketDesk {
    pub async fn classify(&self, query: &str) -> Result<Intent, AppError> {
        Ok(classifier::classify(self.llm.as_ref(), self.parser.as_ref(), query).await?)
    }

    pub async fn answer(&self, query: &str) -> Result<QueryResponse, AppError> {
        let intent = self.classify(query).await?;
        let answer = self.dispatch(query, route(&intent)).await?;
        Ok(QueryResponse { intent, answer })
    }

    async fn dispatch(&self, query: &str, route: Route) -> Result<QueryAnswer, AppError> {
        match route {
            Route::Price { company, symbol } => {
                info!("Fetching live stock price for {company} ({symbol})");
                let quote = fetch_quote(&self.data, &symbol).await?;
                let message = match &quote {
                    QuoteOutcome::Price(price) => {
                        format!("The current stock price of {company} is: ${price}")
                    }
                    QuoteOutcome::NotFound => quote.display_value().to_string(),
                };
                Ok(QueryAnswer::Price {
                    company,
                    symbol,
                    quote,
                    message,
                })
            }
            Route::Chart {
                company,
                symbol,
                interval,
            } => {
                info!(
                    "Fetching {} chart for {company} ({symbol})",
                    interval.label().to_lowercase()
                );
                let chart = fetch_chart(&self.data, &symbol, interval).await?;
                let message = matches!(chart, ChartOutcome::NotFound)
                    .then(|| CHART_NOT_FOUND.to_string());
                Ok(QueryAnswer::Chart {
                    title: format!("{company} {} Stock Prices", interval.label()),
                    company,
                    symbol,
                    interval,
                    chart,
                    message,
                })
            }
            Route::General => {
                let answer = responder::answer(self.llm.as_ref(), query, None).await?;
                Ok(QueryAnswer::General { answer })
            }
            Route::Unresolved => Ok(QueryAnswer::Unresolved {
                message: UNRESOLVED_QUERY.to_string(),
            }),
        }
    }
}
