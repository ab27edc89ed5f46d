pub mod binance_rest;
pub mod gold_api;
pub mod ticker_response;

pub use binance_rest::{BinanceKlineSource, BinanceTickerSource};
pub use gold_api::GoldApiSource;
pub use ticker_response::{RawStreamEvent, TickerEvent, TickerPriceResponse};

/// Combined-stream websocket base; stream names get appended, separated by
/// `/`.
pub fn get_ws_base_url() -> &'static str {
    "wss://stream.binance.com:9443/stream?streams="
}
