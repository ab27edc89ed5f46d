use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use common::models::{PriceUpdate, Symbol};

use crate::error::FeedError;
use crate::remote::{RawStreamEvent, TickerEvent, get_ws_base_url};

const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Streaming push adapter: one combined Binance websocket carrying a
/// `@ticker` stream per tracked symbol.
///
/// Malformed messages are dropped with a warning; on transport failure the
/// connection is re-established after a short delay and the snapshots keep
/// their last known prices in the meantime.
pub struct StreamService {
    symbols: Vec<Symbol>,
    update_tx: mpsc::Sender<PriceUpdate>,
    shutdown: watch::Receiver<bool>,
}

impl StreamService {
    pub fn new(
        symbols: Vec<Symbol>,
        update_tx: mpsc::Sender<PriceUpdate>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            symbols,
            update_tx,
            shutdown,
        }
    }

    pub async fn run(self) {
        let streams: Vec<String> = self
            .symbols
            .iter()
            .map(|s| format!("{}@ticker", s.stream_name()))
            .collect();
        let url = format!("{}{}", get_ws_base_url(), streams.join("/"));
        let mut shutdown = self.shutdown.clone();

        info!("Connecting to: {}", url);

        loop {
            if *shutdown.borrow() {
                return;
            }

            match tokio_tungstenite::connect_async(url.as_str()).await {
                Ok((ws_stream, _)) => {
                    let (mut write, mut read) = ws_stream.split();

                    loop {
                        tokio::select! {
                            changed = shutdown.changed() => {
                                if changed.is_err() || *shutdown.borrow() {
                                    info!("Stream service shutting down");
                                    return;
                                }
                            }
                            msg = read.next() => {
                                let Some(msg) = msg else { break };
                                match msg {
                                    Ok(Message::Text(text)) => {
                                        match Self::parse_ticker(text.as_str()) {
                                            Ok(update) => {
                                                if self.update_tx.send(update).await.is_err() {
                                                    return;
                                                }
                                            }
                                            // Dropped whole, no partial mutation.
                                            Err(e) => warn!("Dropping feed message: {}", e),
                                        }
                                    }
                                    Ok(Message::Ping(payload)) => {
                                        let _ = write.send(Message::Pong(payload)).await;
                                    }
                                    Ok(Message::Close(_)) => {
                                        debug!("Close frame received");
                                        break;
                                    }
                                    Err(e) => {
                                        error!("WebSocket error: {}", e);
                                        break;
                                    }
                                    _ => continue,
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("Connection failed: {}. Retrying in 2s...", e);
                }
            }

            tokio::select! {
                _ = time::sleep(RECONNECT_DELAY) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Stream service shutting down");
                        return;
                    }
                }
            }
        }
    }

    fn parse_ticker(text: &str) -> Result<PriceUpdate, FeedError> {
        let raw: RawStreamEvent = serde_json::from_str(text)?;
        if !raw.stream.ends_with("@ticker") {
            return Err(FeedError::Malformed(format!(
                "unexpected stream: {}",
                raw.stream
            )));
        }

        let event: TickerEvent = serde_json::from_value(raw.data)?;
        let symbol = Symbol::from_ticker(&event.symbol)
            .ok_or_else(|| FeedError::Malformed(format!("unknown symbol: {}", event.symbol)))?;

        Ok(PriceUpdate {
            symbol,
            price: event.price()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_event_becomes_a_price_update() {
        let text = r#"{"stream":"btcusdt@ticker","data":{"s":"BTCUSDT","c":"50123.45"}}"#;
        let update = StreamService::parse_ticker(text).unwrap();
        assert_eq!(update.symbol, Symbol::Btc);
        assert_eq!(update.price, 50123.45);
    }

    #[test]
    fn unparseable_json_is_malformed() {
        assert!(matches!(
            StreamService::parse_ticker("{not json"),
            Err(FeedError::Malformed(_))
        ));
    }

    #[test]
    fn unexpected_stream_name_is_malformed() {
        let text = r#"{"stream":"btcusdt@depth","data":{}}"#;
        assert!(matches!(
            StreamService::parse_ticker(text),
            Err(FeedError::Malformed(_))
        ));
    }

    #[test]
    fn untracked_symbol_is_malformed() {
        let text = r#"{"stream":"ethusdt@ticker","data":{"s":"ETHUSDT","c":"4000.0"}}"#;
        assert!(matches!(
            StreamService::parse_ticker(text),
            Err(FeedError::Malformed(_))
        ));
    }
}
