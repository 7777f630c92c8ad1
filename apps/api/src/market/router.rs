//! Router: pure dispatch from an `Intent` to the fetcher that serves it.

use crate::market::intent::{ChartInterval, Intent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Price {
        company: String,
        symbol: String,
    },
    Chart {
        company: String,
        symbol: String,
        interval: ChartInterval,
    },
    General,
    /// Missing symbol or interval; nothing is fetched.
    Unresolved,
}

pub fn route(intent: &Intent) -> Route {
    match intent {
        Intent::StockPrice {
            company,
            symbol: Some(symbol),
        } => Route::Price {
            company: company.clone().unwrap_or_default(),
            symbol: symbol.clone(),
        },
        Intent::StockChart {
            company,
            interval: Some(interval),
            symbol: Some(symbol),
        } => Route::Chart {
            company: company.clone().unwrap_or_default(),
            symbol: symbol.clone(),
            interval: *interval,
        },
        Intent::General => Route::General,
        _ => Route::Unresolved,
    }
}
