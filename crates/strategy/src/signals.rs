use common::models::{Signal, Trend};

pub const OVERSOLD: f64 = 30.0;
pub const OVERBOUGHT: f64 = 70.0;

/// Base policy: oversold in an uptrend is a buy, overbought in a downtrend a
/// sell, everything else waits.
///
/// Evaluated fresh on every call with no hysteresis, so a value oscillating
/// across the thresholds flips the signal each time.
pub fn classify(rsi: Option<f64>, trend: Trend) -> Signal {
    match rsi {
        Some(rsi) if rsi < OVERSOLD && trend == Trend::Up => Signal::Buy,
        Some(rsi) if rsi > OVERBOUGHT && trend == Trend::Down => Signal::Sell,
        _ => Signal::Wait,
    }
}

/// Extended policy driven by the synthetic projection and a sentiment score
/// in `[0, 1]`. Branch order matters: STRONG_BUY is checked before BUY, and
/// SELL looks at sentiment alone.
pub fn classify_extended(price: f64, predicted_price: f64, sentiment: f64) -> Signal {
    if predicted_price > price * 1.02 && sentiment > 0.75 {
        Signal::StrongBuy
    } else if predicted_price > price && sentiment > 0.6 {
        Signal::Buy
    } else if sentiment < 0.4 {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversold_uptrend_is_a_buy() {
        assert_eq!(classify(Some(25.0), Trend::Up), Signal::Buy);
    }

    #[test]
    fn overbought_downtrend_is_a_sell() {
        assert_eq!(classify(Some(75.0), Trend::Down), Signal::Sell);
    }

    #[test]
    fn neutral_rsi_waits() {
        assert_eq!(classify(Some(50.0), Trend::Sideways), Signal::Wait);
    }

    #[test]
    fn threshold_needs_the_matching_trend() {
        assert_eq!(classify(Some(25.0), Trend::Down), Signal::Wait);
        assert_eq!(classify(Some(75.0), Trend::Up), Signal::Wait);
    }

    #[test]
    fn unset_rsi_always_waits() {
        assert_eq!(classify(None, Trend::Up), Signal::Wait);
    }

    #[test]
    fn strong_projection_and_sentiment_is_a_strong_buy() {
        assert_eq!(classify_extended(100.0, 103.0, 0.8), Signal::StrongBuy);
    }

    #[test]
    fn modest_projection_with_decent_sentiment_is_a_buy() {
        assert_eq!(classify_extended(100.0, 101.0, 0.65), Signal::Buy);
        // Strong projection but sentiment below the 0.75 bar drops to BUY.
        assert_eq!(classify_extended(100.0, 103.0, 0.7), Signal::Buy);
    }

    #[test]
    fn poor_sentiment_sells_regardless_of_projection() {
        assert_eq!(classify_extended(100.0, 110.0, 0.3), Signal::Sell);
        assert_eq!(classify_extended(100.0, 90.0, 0.3), Signal::Sell);
    }

    #[test]
    fn everything_else_holds() {
        assert_eq!(classify_extended(100.0, 99.0, 0.5), Signal::Hold);
        assert_eq!(classify_extended(100.0, 101.0, 0.5), Signal::Hold);
    }
}
