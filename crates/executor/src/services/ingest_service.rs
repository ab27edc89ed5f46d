use tokio::sync::mpsc;
use tracing::{debug, info};

use common::models::PriceUpdate;
use strategy::analysis;

use crate::state::SharedState;

/// Single writer for the snapshot map: drains price updates from every
/// active feed and folds each one into the matching snapshot.
pub async fn run(state: SharedState, mut update_rx: mpsc::Receiver<PriceUpdate>) {
    while let Some(update) = update_rx.recv().await {
        let mut map = state.lock().await;
        if let Some(snapshot) = map.get_mut(&update.symbol) {
            analysis::observe(snapshot, update.price);
            debug!(
                "{} updated: ${} | RSI: {}",
                snapshot.symbol.display_name(),
                update.price,
                snapshot
                    .rsi
                    .map(|r| format!("{r:.2}"))
                    .unwrap_or_else(|| "n/a".to_string())
            );
        }
    }
    info!("Update channel closed, ingest stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::new_shared_state;
    use common::models::{RSI_PERIOD, Symbol};

    #[tokio::test]
    async fn updates_flow_into_the_matching_snapshot() {
        let state = new_shared_state();
        let (update_tx, update_rx) = mpsc::channel(32);

        for i in 0..3 {
            update_tx
                .send(PriceUpdate {
                    symbol: Symbol::Btc,
                    price: 100.0 + f64::from(i),
                })
                .await
                .unwrap();
        }
        drop(update_tx);
        run(state.clone(), update_rx).await;

        let map = state.lock().await;
        assert_eq!(map[&Symbol::Btc].price, 102.0);
        assert_eq!(map[&Symbol::Btc].closes.len(), 3);
        // The other symbol is untouched.
        assert_eq!(map[&Symbol::Xau].price, 0.0);
    }

    #[tokio::test]
    async fn a_full_window_yields_an_rsi() {
        let state = new_shared_state();
        let (update_tx, update_rx) = mpsc::channel(32);

        for i in 0..RSI_PERIOD {
            update_tx
                .send(PriceUpdate {
                    symbol: Symbol::Xau,
                    price: 1_900.0 + i as f64,
                })
                .await
                .unwrap();
        }
        drop(update_tx);
        run(state.clone(), update_rx).await;

        let map = state.lock().await;
        assert!(map[&Symbol::Xau].rsi.is_some());
    }
}
