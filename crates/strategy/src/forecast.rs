use rand::Rng;

/// Sentiment reported when no headlines are available.
pub const NEUTRAL_SENTIMENT: f64 = 0.5;

/// Synthetic price projection: the current price perturbed by a uniform draw
/// within the symbol's volatility band. A randomized placeholder, not a
/// forecast.
pub fn predict_price<R: Rng>(rng: &mut R, price: f64, volatility: f64) -> f64 {
    let drift = rng.gen_range(-volatility..=volatility);
    price * (1.0 + drift)
}

/// Rescales raw signed per-headline polarities (roughly -5..5) into a single
/// score in `[0, 1]` via `(raw + 5) / 10`, averaged across headlines.
/// Headline retrieval itself lives outside this crate; an empty slice yields
/// the neutral default.
pub fn sentiment_score(polarities: &[f64]) -> f64 {
    if polarities.is_empty() {
        return NEUTRAL_SENTIMENT;
    }
    let avg = polarities.iter().sum::<f64>() / polarities.len() as f64;
    ((avg + 5.0) / 10.0).clamp(0.0, 1.0)
}
