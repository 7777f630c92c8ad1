//! Chart Fetcher: daily/weekly/monthly OHLCV series for one ticker.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::market::data_client::{MarketDataClient, MarketError};
use crate::market::intent::ChartInterval;

/// One row of the series, with the upstream `"1. open"`-style keys renamed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub symbol: String,
    pub interval: ChartInterval,
    /// Ascending by date.
    pub candles: Vec<Candle>,
}

/// `NotFound` means the series key was absent from the response, which is
/// distinct from a present-but-empty series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "series", rename_all = "snake_case")]
pub enum ChartOutcome {
    Series(ChartSeries),
    NotFound,
}

pub async fn fetch_chart(
    client: &MarketDataClient,
    symbol: &str,
    interval: ChartInterval,
) -> Result<ChartOutcome, MarketError> {
    let body = client.query(interval.api_function(), symbol).await?;
    parse_series(&body, symbol, interval)
}

pub fn parse_series(
    body: &Value,
    symbol: &str,
    interval: ChartInterval,
) -> Result<ChartOutcome, MarketError> {
    let Some(rows) = body.get(interval.series_key()).and_then(Value::as_object) else {
        return Ok(ChartOutcome::NotFound);
    };

    let mut candles = rows
        .iter()
        .map(|(date, fields)| parse_candle(date, fields))
        .collect::<Result<Vec<_>, _>>()?;
    candles.sort_by_key(|c| c.date);

    Ok(ChartOutcome::Series(ChartSeries {
        symbol: symbol.to_string(),
        interval,
        candles,
    }))
}

fn parse_candle(date: &str, fields: &Value) -> Result<Candle, MarketError> {
    let parsed_date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        MarketError::Malformed {
            date: date.to_string(),
            field: "date",
            value: date.to_string(),
        }
    })?;
    Ok(Candle {
        date: parsed_date,
        open: number_field(date, fields, "1. open", "open")?,
        high: number_field(date, fields, "2. high", "high")?,
        low: number_field(date, fields, "3. low", "low")?,
        close: number_field(date, fields, "4. close", "close")?,
        volume: number_field(date, fields, "5. volume", "volume")?,
    })
}

fn number_field<T: std::str::FromStr>(
    date: &str,
    fields: &Value,
    key: &str,
    field: &'static str,
) -> Result<T, MarketError> {
    let raw = match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        other => {
            return Err(MarketError::Malformed {
                date: date.to_string(),
                field,
                value: other.map(Value::to_string).unwrap_or_default(),
            })
        }
    };
    raw.trim().parse::<T>().map_err(|_| MarketError::Malformed {
        date: date.to_string(),
        field,
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn row(open: &str, close: &str) -> Value {
        json!({
            "1. open": open,
            "2. high": "200.00",
            "3. low": "100.00",
            "4. close": close,
            "5. volume": "123456"
        })
    }

    #[test]
    fn test_series_is_sorted_ascending_by_date() {
        let body = json!({
            "Meta Data": {"2. Symbol": "TSLA"},
            "Monthly Time Series": {
                "2024-03-28": row("180.0", "175.79"),
                "2024-01-31": row("250.0", "187.29"),
                "2024-02-29": row("188.5", "201.88")
            }
        });
        let outcome = parse_series(&body, "TSLA", ChartInterval::Monthly).unwrap();
        let ChartOutcome::Series(series) = outcome else {
            panic!("expected a series");
        };
        let dates: Vec<String> = series
            .candles
            .iter()
            .map(|c| c.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-31", "2024-02-29", "2024-03-28"]);
        assert!((series.candles[0].close - 187.29).abs() < f64::EPSILON);
        assert_eq!(series.candles[0].volume, 123456);
    }

    #[test]
    fn test_missing_series_key_is_not_found() {
        let body = json!({"Information": "rate limit reached"});
        assert_eq!(
            parse_series(&body, "TSLA", ChartInterval::Daily).unwrap(),
            ChartOutcome::NotFound
        );
    }

    #[test]
    fn test_wrong_interval_key_is_not_found() {
        let body = json!({"Weekly Time Series": {"2024-01-05": row("1", "2")}});
        assert_eq!(
            parse_series(&body, "TSLA", ChartInterval::Daily).unwrap(),
            ChartOutcome::NotFound
        );
    }

    #[test]
    fn test_empty_series_is_distinct_from_not_found() {
        let body = json!({"Time Series (Daily)": {}});
        match parse_series(&body, "AAPL", ChartInterval::Daily).unwrap() {
            ChartOutcome::Series(series) => assert!(series.candles.is_empty()),
            ChartOutcome::NotFound => panic!("empty series must not be NotFound"),
        }
    }

    #[test]
    fn test_unparseable_number_is_malformed() {
        let body = json!({"Time Series (Daily)": {"2024-01-05": row("n/a", "2")}});
        let err = parse_series(&body, "AAPL", ChartInterval::Daily).unwrap_err();
        assert!(matches!(err, MarketError::Malformed { field: "open", .. }));
    }

    #[tokio::test]
    async fn test_fetch_chart_selects_function_per_interval() {
        let cases = [
            ("daily", "TIME_SERIES_DAILY", "Time Series (Daily)"),
            ("WEEKLY", "TIME_SERIES_WEEKLY", "Weekly Time Series"),
            ("Monthly", "TIME_SERIES_MONTHLY", "Monthly Time Series"),
        ];
        for (label, function, key) in cases {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(query_param("function", function))
                .and(query_param("symbol", "GOOGL"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({ key: {"2024-01-05": row("1", "2")} })),
                )
                .expect(1)
                .mount(&server)
                .await;

            let client = MarketDataClient::new("demo".to_string(), server.uri()).unwrap();
            let interval = ChartInterval::from_label(label);
            let outcome = fetch_chart(&client, "GOOGL", interval).await.unwrap();
            assert!(
                matches!(outcome, ChartOutcome::Series(ref s) if s.candles.len() == 1),
                "interval {label}"
            );
        }
    }
}
