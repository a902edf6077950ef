use crate::engine::Stats;

/// A possible reversal at a zone, raised when the last real close sits
/// within one volatility unit of support or resistance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reversal {
    /// Price is pressing against resistance.
    Bearish,
    /// Price is pressing against support.
    Bullish,
}

impl Reversal {
    /// Checks `last_close` against the zones. Resistance wins when both match.
    pub fn detect(last_close: f64, stats: &Stats) -> Option<Self> {
        if last_close >= stats.resistance() - stats.volatility() {
            Some(Self::Bearish)
        } else if last_close <= stats.support() + stats.volatility() {
            Some(Self::Bullish)
        } else {
            None
        }
    }
}
