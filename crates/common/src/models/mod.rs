pub mod signal;
pub mod snapshot;

pub use signal::Signal;
pub use snapshot::{MarketSnapshot, PriceUpdate, RSI_PERIOD, Symbol, Trend};
