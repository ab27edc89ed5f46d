use serde::Deserialize;
use serde_json::Value;

use crate::error::FeedError;

/// Envelope of a combined-stream event. `data` stays untyped until the
/// stream name tells us what it is.
#[derive(Debug, Deserialize)]
pub struct RawStreamEvent {
    pub stream: String,
    pub data: Value,
}

/// Payload of a `<symbol>@ticker` stream event. Only the last price is used.
#[derive(Debug, Deserialize)]
pub struct TickerEvent {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "c")]
    pub last_price: String,
}

impl TickerEvent {
    pub fn price(&self) -> Result<f64, FeedError> {
        self.last_price.parse().map_err(|_| {
            FeedError::Malformed(format!("unparseable last price: {}", self.last_price))
        })
    }
}

/// Response of the REST `/api/v3/ticker/price` endpoint.
#[derive(Debug, Deserialize)]
pub struct TickerPriceResponse {
    pub symbol: String,
    pub price: String,
}

impl TickerPriceResponse {
    pub fn price(&self) -> Result<f64, FeedError> {
        self.price
            .parse()
            .map_err(|_| FeedError::Malformed(format!("unparseable price: {}", self.price)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_event_parses_the_last_price() {
        let event: TickerEvent =
            serde_json::from_str(r#"{"s":"BTCUSDT","c":"50123.45","o":"49000.00"}"#).unwrap();
        assert_eq!(event.symbol, "BTCUSDT");
        assert_eq!(event.price().unwrap(), 50123.45);
    }

    #[test]
    fn garbage_price_is_malformed() {
        let event = TickerEvent {
            symbol: "BTCUSDT".into(),
            last_price: "not-a-number".into(),
        };
        assert!(matches!(event.price(), Err(FeedError::Malformed(_))));
    }
}
