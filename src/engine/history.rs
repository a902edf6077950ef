use std::sync::Arc;

use crate::engine::Candle;
use crate::errors::{Error, Result};

use chrono::Duration;

/// A non-empty sequence of real candles with strictly increasing timestamps.
///
/// The candles are shared behind an `Arc` so a history can be cloned into
/// caches and outlooks without copying the bars.
#[derive(Debug, Clone)]
pub struct History {
    data: Arc<[Candle]>,
}

impl History {
    /// Creates a new history.
    ///
    /// ### Arguments
    /// * `data` - Candles in chronological order.
    ///
    /// ### Returns
    /// The history, or an error if `data` is empty or not strictly increasing in time.
    ///
    /// ### Example
    /// ```rust
    /// use ghost_bars::prelude::*;
    /// use chrono::{DateTime, Duration};
    ///
    /// let candles = (0..3)
    ///     .map(|i| {
    ///         CandleBuilder::builder()
    ///             .open(100.0)
    ///             .high(101.0)
    ///             .low(99.0)
    ///             .close(100.5)
    ///             .timestamp(DateTime::default() + Duration::minutes(5 * i))
    ///             .build()
    ///             .unwrap()
    ///     })
    ///     .collect::<Vec<_>>();
    ///
    /// let history = History::new(candles).unwrap();
    /// assert_eq!(history.interval(), Some(Duration::minutes(5)));
    /// ```
    pub fn new(data: impl Into<Arc<[Candle]>>) -> Result<Self> {
        let data = data.into();
        if data.is_empty() {
            return Err(Error::CandleDataEmpty);
        }

        if let Some(idx) = data.windows(2).position(|w| w[1].timestamp() <= w[0].timestamp()) {
            return Err(Error::UnorderedCandles(idx + 1));
        }

        Ok(Self { data })
    }

    /// Returns an iterator over the candles.
    pub fn candles(&self) -> std::slice::Iter<'_, Candle> {
        self.data.iter()
    }

    /// Returns the shared candle slice.
    pub fn shared(&self) -> Arc<[Candle]> {
        Arc::clone(&self.data)
    }

    /// Returns the number of candles.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a history holds at least one candle.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the most recent candle.
    pub fn last(&self) -> &Candle {
        // non-empty by construction
        &self.data[self.data.len() - 1]
    }

    /// Returns the last `n` candles, or all of them if fewer exist.
    pub fn tail(&self, n: usize) -> &[Candle] {
        &self.data[self.data.len().saturating_sub(n)..]
    }

    /// Returns the spacing between the last two candles, if there are two.
    pub fn interval(&self) -> Option<Duration> {
        match self.data.len() {
            0 | 1 => None,
            n => Some(self.data[n - 1].timestamp() - self.data[n - 2].timestamp()),
        }
    }
}
