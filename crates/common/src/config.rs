use std::env;
use std::time::Duration;

use anyhow::{Context, bail};

/// Which feed adapter family drives the snapshot map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// Combined Binance websocket, one update per ticker event.
    Stream,
    /// Self-rescheduling REST poll at a fixed delay.
    Poll,
    /// Static prices seeded once at startup, never updated.
    Mock,
}

/// Which REST endpoint the crypto poll feed reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollSource {
    /// `/api/v3/ticker/price`, one last-price quote per poll.
    Ticker,
    /// `/api/v3/klines?limit=1`, the close of the latest candle.
    Klines,
}

const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    /// goldapi.io access token. Without it the gold price falls back to the
    /// Binance XAUUSDT ticker.
    pub gold_api_key: Option<String>,
    pub feed_mode: FeedMode,
    pub poll_source: PollSource,
    pub poll_interval: Duration,
    /// Adds the projected-price line and routes the signal through the
    /// extended classifier.
    pub extended_signals: bool,
}

impl Config {
    /// Reads the full configuration from the environment. A missing Telegram
    /// token is fatal to the whole process.
    pub fn from_env() -> anyhow::Result<Self> {
        let telegram_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN not set")?;

        let gold_api_key = env::var("GOLD_API_KEY").ok().filter(|k| !k.is_empty());

        let feed_mode = match env::var("FEED_MODE").as_deref() {
            Err(_) | Ok("") | Ok("stream") => FeedMode::Stream,
            Ok("poll") => FeedMode::Poll,
            Ok("mock") => FeedMode::Mock,
            Ok(other) => bail!("unknown FEED_MODE: {other} (expected stream, poll or mock)"),
        };

        let poll_source = match env::var("POLL_SOURCE").as_deref() {
            Err(_) | Ok("") | Ok("ticker") => PollSource::Ticker,
            Ok("klines") => PollSource::Klines,
            Ok(other) => bail!("unknown POLL_SOURCE: {other} (expected ticker or klines)"),
        };

        let poll_interval = match env::var("POLL_INTERVAL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("POLL_INTERVAL_SECS must be a number of seconds")?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        let extended_signals = matches!(
            env::var("EXTENDED_SIGNALS").as_deref(),
            Ok("1") | Ok("true") | Ok("yes")
        );

        Ok(Self {
            telegram_token,
            gold_api_key,
            feed_mode,
            poll_source,
            poll_interval,
            extended_signals,
        })
    }
}
