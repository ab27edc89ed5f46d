use tokio::sync::mpsc;
use tracing::info;

use common::models::{PriceUpdate, Symbol};

/// Static feed for demos and offline runs: seeds one price per symbol at
/// startup and never updates again.
pub struct MockService {
    prices: Vec<(Symbol, f64)>,
    update_tx: mpsc::Sender<PriceUpdate>,
}

impl MockService {
    pub fn new(prices: Vec<(Symbol, f64)>, update_tx: mpsc::Sender<PriceUpdate>) -> Self {
        Self { prices, update_tx }
    }

    pub async fn run(self) {
        for (symbol, price) in self.prices {
            if self.update_tx.send(PriceUpdate { symbol, price }).await.is_err() {
                return;
            }
        }
        info!("Mock feed seeded; no further updates will be published");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publishes_exactly_one_update_per_symbol() {
        let (update_tx, mut update_rx) = mpsc::channel(8);
        let prices = vec![(Symbol::Btc, 50_000.0), (Symbol::Xau, 1_900.0)];

        MockService::new(prices.clone(), update_tx).run().await;

        let mut seen = Vec::new();
        while let Some(update) = update_rx.recv().await {
            seen.push((update.symbol, update.price));
        }
        assert_eq!(seen, prices);
    }
}
