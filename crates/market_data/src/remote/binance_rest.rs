use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::FeedError;
use crate::remote::ticker_response::TickerPriceResponse;
use crate::traits::PriceSource;

const DEFAULT_BASE_URL: &str = "https://api.binance.com";
const USER_AGENT: &str = "market_signal_bot/0.1.0";

fn build_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client.")
}

/// Spot last price via `/api/v3/ticker/price`.
pub struct BinanceTickerSource {
    client: Client,
    base_url: String,
    symbol: String,
}

impl BinanceTickerSource {
    pub fn new(symbol: &str) -> Self {
        Self {
            client: build_client(),
            base_url: DEFAULT_BASE_URL.to_string(),
            symbol: symbol.to_uppercase(),
        }
    }
}

#[async_trait]
impl PriceSource for BinanceTickerSource {
    fn name(&self) -> &'static str {
        "binance-ticker"
    }

    async fn fetch_price(&self) -> Result<f64, FeedError> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", self.symbol.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Transient(format!("HTTP {status}")));
        }

        let ticker = resp.json::<TickerPriceResponse>().await?;
        ticker.price()
    }
}

/// Last close via `/api/v3/klines?limit=1`, the OHLCV flavour of the same
/// feed. One candle per poll.
pub struct BinanceKlineSource {
    client: Client,
    base_url: String,
    symbol: String,
    interval: String,
}

impl BinanceKlineSource {
    pub fn new(symbol: &str, interval: &str) -> Self {
        Self {
            client: build_client(),
            base_url: DEFAULT_BASE_URL.to_string(),
            symbol: symbol.to_uppercase(),
            interval: interval.to_string(),
        }
    }
}

#[async_trait]
impl PriceSource for BinanceKlineSource {
    fn name(&self) -> &'static str {
        "binance-klines"
    }

    async fn fetch_price(&self) -> Result<f64, FeedError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", self.symbol.as_str()),
                ("interval", self.interval.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Transient(format!("HTTP {status}")));
        }

        let rows = resp.json::<Vec<Vec<Value>>>().await?;
        parse_kline_close(&rows)
    }
}

/// Pulls the close price out of a klines response. Rows are positional
/// arrays; index 4 is the close, encoded as a string.
fn parse_kline_close(rows: &[Vec<Value>]) -> Result<f64, FeedError> {
    let row = rows
        .last()
        .ok_or_else(|| FeedError::Malformed("empty klines response".to_string()))?;
    let close = row
        .get(4)
        .and_then(Value::as_str)
        .ok_or_else(|| FeedError::Malformed("missing close field in kline row".to_string()))?;
    close
        .parse()
        .map_err(|_| FeedError::Malformed(format!("unparseable close: {close}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Vec<Value>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn close_comes_from_the_last_row() {
        let rows = rows(json!([
            [1000, "1.0", "2.0", "0.5", "1.5", "10.0", 1059, "15.0", 3, "5.0", "7.5", "0"],
            [1060, "1.5", "2.5", "1.0", "2.0", "11.0", 1119, "22.0", 4, "6.0", "12.0", "0"]
        ]));
        assert_eq!(parse_kline_close(&rows).unwrap(), 2.0);
    }

    #[test]
    fn empty_response_is_malformed() {
        assert!(matches!(
            parse_kline_close(&[]),
            Err(FeedError::Malformed(_))
        ));
    }

    #[test]
    fn numeric_close_field_is_malformed() {
        // Binance encodes prices as strings; a bare number means a schema
        // change we refuse to guess about.
        let rows = rows(json!([[1000, "1.0", "2.0", "0.5", 1.5, "10.0"]]));
        assert!(matches!(
            parse_kline_close(&rows),
            Err(FeedError::Malformed(_))
        ));
    }
}
