use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Length of the rolling close window and the RSI lookback.
pub const RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Btc,
    Xau,
}

impl Symbol {
    pub fn all() -> [Symbol; 2] {
        [Symbol::Btc, Symbol::Xau]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Symbol::Btc => "BITCOIN",
            Symbol::Xau => "GOLD",
        }
    }

    pub fn pair(&self) -> &'static str {
        match self {
            Symbol::Btc => "BTC/USDT",
            Symbol::Xau => "XAU/USD",
        }
    }

    /// Lowercase Binance stream name, e.g. `btcusdt` in `btcusdt@ticker`.
    pub fn stream_name(&self) -> &'static str {
        match self {
            Symbol::Btc => "btcusdt",
            Symbol::Xau => "xauusdt",
        }
    }

    /// Maps an exchange ticker symbol back to the tracked asset.
    pub fn from_ticker(ticker: &str) -> Option<Symbol> {
        match ticker.to_ascii_uppercase().as_str() {
            "BTCUSDT" => Some(Symbol::Btc),
            "XAUUSDT" => Some(Symbol::Xau),
            _ => None,
        }
    }

    /// Hard-coded price substituted by the fallback-constant poll feed when a
    /// fetch fails.
    pub fn fallback_price(&self) -> f64 {
        match self {
            Symbol::Btc => 50_000.0,
            Symbol::Xau => 1_900.0,
        }
    }

    /// Half-width of the uniform band used by the synthetic price projection.
    pub fn volatility(&self) -> f64 {
        match self {
            Symbol::Btc => 0.05,
            Symbol::Xau => 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Sideways,
}

/// A `(symbol, price)` update emitted by whichever feed adapter is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceUpdate {
    pub symbol: Symbol,
    pub price: f64,
}

/// Latest known price and indicator state for one tracked symbol.
///
/// Created once at startup with placeholder fields and overwritten in place
/// for the process lifetime. `rsi` stays `None` until `closes` holds exactly
/// `RSI_PERIOD` entries.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub symbol: Symbol,
    pub price: f64,
    pub rsi: Option<f64>,
    pub trend: Trend,
    pub closes: VecDeque<f64>,
    /// Time of the last local recomputation, not of the feed data.
    pub updated_at: DateTime<Local>,
}

impl MarketSnapshot {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            price: 0.0,
            rsi: None,
            trend: Trend::Sideways,
            closes: VecDeque::with_capacity(RSI_PERIOD),
            updated_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_mapping_covers_both_assets() {
        assert_eq!(Symbol::from_ticker("BTCUSDT"), Some(Symbol::Btc));
        assert_eq!(Symbol::from_ticker("xauusdt"), Some(Symbol::Xau));
        assert_eq!(Symbol::from_ticker("ETHUSDT"), None);
    }

    #[test]
    fn new_snapshot_has_placeholder_fields() {
        let snapshot = MarketSnapshot::new(Symbol::Btc);
        assert_eq!(snapshot.price, 0.0);
        assert_eq!(snapshot.rsi, None);
        assert_eq!(snapshot.trend, Trend::Sideways);
        assert!(snapshot.closes.is_empty());
    }
}
