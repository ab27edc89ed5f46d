use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing::{info, warn};

use common::models::{PriceUpdate, Symbol};

use crate::error::FeedError;
use crate::traits::PriceSource;

/// What a poll feed reports when a fetch attempt fails transiently.
///
/// An explicit per-feed choice: the poll feeds substitute their fixed
/// constants, the stream feed keeps the stale price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailurePolicy {
    /// Emit nothing; the snapshot keeps its last known value.
    PreserveStale,
    /// Emit this constant in place of a live price.
    Fallback(f64),
}

/// Fixed-delay poll adapter over any `PriceSource`.
///
/// The delay is armed after each attempt completes, so a slow call pushes the
/// next poll back. The loop itself is the only retry mechanism.
pub struct PollService<S: PriceSource> {
    symbol: Symbol,
    source: S,
    policy: FailurePolicy,
    interval: Duration,
    update_tx: mpsc::Sender<PriceUpdate>,
    shutdown: watch::Receiver<bool>,
}

impl<S: PriceSource> PollService<S> {
    pub fn new(
        symbol: Symbol,
        source: S,
        policy: FailurePolicy,
        interval: Duration,
        update_tx: mpsc::Sender<PriceUpdate>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            symbol,
            source,
            policy,
            interval,
            update_tx,
            shutdown,
        }
    }

    pub async fn run(self) {
        let mut shutdown = self.shutdown.clone();
        info!(
            "Polling {} via {} every {:?}",
            self.symbol.display_name(),
            self.source.name(),
            self.interval
        );

        loop {
            if let Some(update) = self.poll_once().await {
                if self.update_tx.send(update).await.is_err() {
                    return;
                }
            }

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Poll service for {} shutting down", self.symbol.display_name());
                        return;
                    }
                }
            }
        }
    }

    /// One fetch attempt, mapped through the failure policy. `None` means
    /// nothing gets published this round.
    async fn poll_once(&self) -> Option<PriceUpdate> {
        match self.source.fetch_price().await {
            Ok(price) => Some(PriceUpdate {
                symbol: self.symbol,
                price,
            }),
            Err(err @ FeedError::Transient(_)) => {
                warn!("{}: {}", self.source.name(), err);
                match self.policy {
                    FailurePolicy::PreserveStale => None,
                    FailurePolicy::Fallback(price) => Some(PriceUpdate {
                        symbol: self.symbol,
                        price,
                    }),
                }
            }
            Err(err @ FeedError::Malformed(_)) => {
                // Dropped regardless of policy; a bad payload is not a price.
                warn!("{}: {}", self.source.name(), err);
                None
            }
        }
    }
}
