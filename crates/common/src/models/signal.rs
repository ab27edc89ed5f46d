use std::fmt;

use serde::{Deserialize, Serialize};

/// Final recommendation shown to the user. Derived on every request, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Wait,
    Buy,
    StrongBuy,
    Sell,
    Hold,
}

impl Signal {
    /// Fixed label and emoji per enum value, as rendered in chat replies.
    pub fn label(&self) -> &'static str {
        match self {
            Signal::Wait => "🔄 WAIT",
            Signal::Buy => "🚀 BUY",
            Signal::StrongBuy => "🚀🚀 STRONG BUY",
            Signal::Sell => "⚠️ SELL",
            Signal::Hold => "⏸ HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
