use chrono::Local;
use ta::Next;
use ta::indicators::RelativeStrengthIndex;
use tracing::trace;

use common::models::{MarketSnapshot, RSI_PERIOD, Trend};

/// Feeds one price into the snapshot's rolling close window and refreshes the
/// derived fields.
///
/// The window is a bounded FIFO of `RSI_PERIOD` closes. RSI and the trend
/// flag are only recomputed once the window is full; before that the RSI
/// stays `None` and is rendered as "Calculating...".
pub fn observe(snapshot: &mut MarketSnapshot, price: f64) {
    snapshot.price = price;

    snapshot.closes.push_back(price);
    if snapshot.closes.len() > RSI_PERIOD {
        snapshot.closes.pop_front();
    }

    if snapshot.closes.len() == RSI_PERIOD {
        snapshot.rsi = Some(rsi_over_window(snapshot.closes.iter().copied()));
        // Crude two-point heuristic: current close against the
        // second-to-last entry of the full window. Not a moving-average
        // cross.
        snapshot.trend = if price > snapshot.closes[RSI_PERIOD - 2] {
            Trend::Up
        } else {
            Trend::Down
        };
    }

    snapshot.updated_at = Local::now();
    trace!(
        "{} observed: {} | RSI {:?}",
        snapshot.symbol.display_name(),
        price,
        snapshot.rsi
    );
}

/// RSI over the whole window, recomputed from scratch on every call. A fresh
/// indicator instance means the window itself is the only smoothing carried
/// between updates.
fn rsi_over_window(closes: impl Iterator<Item = f64>) -> f64 {
    let mut rsi = RelativeStrengthIndex::new(RSI_PERIOD).unwrap();
    let mut last = 50.0;
    for close in closes {
        last = rsi.next(close);
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::Symbol;

    fn snapshot_after(prices: impl IntoIterator<Item = f64>) -> MarketSnapshot {
        let mut snapshot = MarketSnapshot::new(Symbol::Btc);
        for price in prices {
            observe(&mut snapshot, price);
        }
        snapshot
    }

    #[test]
    fn window_is_bounded_and_keeps_arrival_order() {
        let snapshot = snapshot_after((1..=20).map(f64::from));
        assert_eq!(snapshot.closes.len(), RSI_PERIOD);
        let expected: Vec<f64> = (7..=20).map(f64::from).collect();
        let actual: Vec<f64> = snapshot.closes.iter().copied().collect();
        assert_eq!(actual, expected);
        assert_eq!(snapshot.price, 20.0);
    }

    #[test]
    fn rsi_is_unset_until_the_window_fills() {
        let mut snapshot = MarketSnapshot::new(Symbol::Xau);
        for i in 1..RSI_PERIOD {
            observe(&mut snapshot, i as f64);
            assert_eq!(snapshot.rsi, None, "unset at {} observations", i);
            assert_eq!(snapshot.trend, Trend::Sideways);
        }
        observe(&mut snapshot, RSI_PERIOD as f64);
        assert!(snapshot.rsi.is_some());
    }

    #[test]
    fn rsi_stays_in_range_once_computed() {
        let mut snapshot = MarketSnapshot::new(Symbol::Btc);
        for i in 0..50 {
            observe(&mut snapshot, 100.0 + ((i * 37) % 11) as f64);
            if let Some(rsi) = snapshot.rsi {
                assert!((0.0..=100.0).contains(&rsi), "RSI out of range: {rsi}");
            }
        }
    }

    #[test]
    fn monotone_rise_pushes_rsi_toward_100_and_trend_up() {
        let snapshot = snapshot_after((1..=30).map(f64::from));
        assert!(snapshot.rsi.unwrap() > 90.0);
        assert_eq!(snapshot.trend, Trend::Up);
    }

    #[test]
    fn monotone_fall_pushes_rsi_toward_0_and_trend_down() {
        let snapshot = snapshot_after((1..=30).rev().map(f64::from));
        assert!(snapshot.rsi.unwrap() < 10.0);
        assert_eq!(snapshot.trend, Trend::Down);
    }

    #[test]
    fn equal_comparison_point_counts_as_down() {
        // Flat window: price is never strictly greater than closes[12].
        let snapshot = snapshot_after(std::iter::repeat(42.0).take(RSI_PERIOD));
        assert_eq!(snapshot.trend, Trend::Down);
    }
}
