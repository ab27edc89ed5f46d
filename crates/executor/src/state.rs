use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use common::models::{MarketSnapshot, Symbol};

/// The process-wide snapshot map, injected into handlers rather than hidden
/// behind a global. Each symbol has exactly one writer (the ingest task);
/// command handlers only read.
pub type SharedState = Arc<Mutex<HashMap<Symbol, MarketSnapshot>>>;

pub fn new_shared_state() -> SharedState {
    let map = Symbol::all()
        .into_iter()
        .map(|symbol| (symbol, MarketSnapshot::new(symbol)))
        .collect();
    Arc::new(Mutex::new(map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn state_starts_with_a_placeholder_snapshot_per_symbol() {
        let state = new_shared_state();
        let map = state.lock().await;
        assert_eq!(map.len(), 2);
        for symbol in Symbol::all() {
            assert_eq!(map[&symbol].price, 0.0);
            assert_eq!(map[&symbol].rsi, None);
        }
    }
}
