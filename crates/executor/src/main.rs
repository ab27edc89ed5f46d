use dotenvy::dotenv;
use teloxide::Bot;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use common::config::{Config, FeedMode, PollSource};
use common::logger;
use common::models::{PriceUpdate, Symbol};
use market_data::remote::{BinanceKlineSource, BinanceTickerSource, GoldApiSource};
use market_data::services::{FailurePolicy, MockService, PollService, StreamService};

mod services;
mod state;

const UPDATE_CHANNEL_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::setup_logger();
    dotenv().ok();
    debug!("System starting up...");

    let config = Config::from_env()?;
    let state = state::new_shared_state();

    let (update_tx, update_rx) = mpsc::channel::<PriceUpdate>(UPDATE_CHANNEL_CAPACITY);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let feed_handles = spawn_feeds(&config, update_tx, shutdown_rx);
    let ingest_handle = tokio::spawn(services::ingest_service::run(state.clone(), update_rx));

    let bot = Bot::new(config.telegram_token.clone());
    services::telegram_service::run(bot, state, config).await;

    // Dispatcher returned (ctrl-c); flip the watch and wait for the feed
    // loops to wind down. Once every feed sender is gone the ingest task
    // drains and stops too.
    info!("Shutting down feed tasks");
    let _ = shutdown_tx.send(true);
    for handle in feed_handles {
        let _ = handle.await;
    }
    let _ = ingest_handle.await;

    Ok(())
}

fn spawn_feeds(
    config: &Config,
    update_tx: mpsc::Sender<PriceUpdate>,
    shutdown_rx: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    match config.feed_mode {
        FeedMode::Stream => {
            vec![tokio::spawn(
                StreamService::new(Symbol::all().to_vec(), update_tx, shutdown_rx).run(),
            )]
        }
        FeedMode::Poll => {
            // The poll feeds keep the hard-coded fallback constants they have
            // always had; the stream feed preserves stale state instead.
            let btc_policy = FailurePolicy::Fallback(Symbol::Btc.fallback_price());
            let xau_policy = FailurePolicy::Fallback(Symbol::Xau.fallback_price());
            let btc_handle = match config.poll_source {
                PollSource::Ticker => tokio::spawn(
                    PollService::new(
                        Symbol::Btc,
                        BinanceTickerSource::new("BTCUSDT"),
                        btc_policy,
                        config.poll_interval,
                        update_tx.clone(),
                        shutdown_rx.clone(),
                    )
                    .run(),
                ),
                PollSource::Klines => tokio::spawn(
                    PollService::new(
                        Symbol::Btc,
                        BinanceKlineSource::new("BTCUSDT", "1m"),
                        btc_policy,
                        config.poll_interval,
                        update_tx.clone(),
                        shutdown_rx.clone(),
                    )
                    .run(),
                ),
            };

            let xau_handle = match &config.gold_api_key {
                Some(api_key) => tokio::spawn(
                    PollService::new(
                        Symbol::Xau,
                        GoldApiSource::new(api_key),
                        xau_policy,
                        config.poll_interval,
                        update_tx,
                        shutdown_rx,
                    )
                    .run(),
                ),
                None => {
                    info!("GOLD_API_KEY not set, gold prices come from the Binance ticker");
                    tokio::spawn(
                        PollService::new(
                            Symbol::Xau,
                            BinanceTickerSource::new("XAUUSDT"),
                            xau_policy,
                            config.poll_interval,
                            update_tx,
                            shutdown_rx,
                        )
                        .run(),
                    )
                }
            };

            vec![btc_handle, xau_handle]
        }
        FeedMode::Mock => {
            let prices = Symbol::all()
                .into_iter()
                .map(|symbol| (symbol, symbol.fallback_price()))
                .collect();
            vec![tokio::spawn(MockService::new(prices, update_tx).run())]
        }
    }
}
