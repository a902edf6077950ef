use crate::errors::{Error, Result};

use chrono::{DateTime, Utc};

/// One OHLCV observation over a fixed interval starting at `timestamp`.
///
/// A candle always satisfies `low <= min(open, close)` and `high >= max(open, close)`.
/// Use [`CandleBuilder`] to create one.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCandle"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Candle {
    /// Returns the opening instant.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the opening price.
    pub fn open(&self) -> f64 {
        self.open
    }

    /// Returns the highest price.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Returns the lowest price.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Returns the closing price.
    pub fn close(&self) -> f64 {
        self.close
    }

    /// Returns the traded volume. Ghost candles carry no volume.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Returns `high - low`.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns `true` if the candle closed at or above its open.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Builder for [`Candle`].
///
/// ### Example
/// ```rust
/// use ghost_bars::prelude::*;
/// use chrono::DateTime;
///
/// let candle = CandleBuilder::builder()
///     .open(100.0)
///     .high(110.0)
///     .low(95.0)
///     .close(105.0)
///     .volume(1.0)
///     .timestamp(DateTime::default())
///     .build()
///     .unwrap();
///
/// assert_eq!(candle.range(), 15.0);
/// ```
#[derive(Debug, Default)]
pub struct CandleBuilder {
    timestamp: Option<DateTime<Utc>>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: f64,
}

impl CandleBuilder {
    /// Creates an empty builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Sets the opening instant.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the opening price.
    pub fn open(mut self, open: f64) -> Self {
        self.open = Some(open);
        self
    }

    /// Sets the highest price.
    pub fn high(mut self, high: f64) -> Self {
        self.high = Some(high);
        self
    }

    /// Sets the lowest price.
    pub fn low(mut self, low: f64) -> Self {
        self.low = Some(low);
        self
    }

    /// Sets the closing price.
    pub fn close(mut self, close: f64) -> Self {
        self.close = Some(close);
        self
    }

    /// Sets the volume (defaults to `0.0`).
    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Validates the fields and builds the candle.
    ///
    /// ### Returns
    /// The candle, or an error if a field is missing, non-finite, or the
    /// high/low do not enclose the open and close.
    pub fn build(self) -> Result<Candle> {
        let timestamp = self.timestamp.ok_or(Error::MissingField("timestamp"))?;
        let open = self.open.ok_or(Error::MissingField("open"))?;
        let high = self.high.ok_or(Error::MissingField("high"))?;
        let low = self.low.ok_or(Error::MissingField("low"))?;
        let close = self.close.ok_or(Error::MissingField("close"))?;

        for (name, value) in [("open", open), ("high", high), ("low", low), ("close", close), ("volume", self.volume)] {
            if !value.is_finite() {
                return Err(Error::NonFinite(name, value));
            }
        }

        if high < open.max(close) || low > open.min(close) {
            return Err(Error::InvalidCandle { open, high, low, close });
        }

        Ok(Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume: self.volume,
        })
    }
}

// Deserialized candles go through the builder so invalid rows are rejected.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCandle {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCandle> for Candle {
    type Error = Error;

    fn try_from(raw: RawCandle) -> Result<Self> {
        CandleBuilder::builder()
            .timestamp(raw.timestamp)
            .open(raw.open)
            .high(raw.high)
            .low(raw.low)
            .close(raw.close)
            .volume(raw.volume)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_valid_candle() {
        let candle = CandleBuilder::builder()
            .open(100.0)
            .high(110.0)
            .low(95.0)
            .close(105.0)
            .volume(3.0)
            .timestamp(DateTime::default())
            .build()
            .unwrap();

        assert_eq!(candle.open(), 100.0);
        assert_eq!(candle.high(), 110.0);
        assert_eq!(candle.low(), 95.0);
        assert_eq!(candle.close(), 105.0);
        assert_eq!(candle.volume(), 3.0);
        assert!(candle.is_bullish());
    }

    #[test]
    fn reject_high_below_close() {
        let result = CandleBuilder::builder()
            .open(100.0)
            .high(104.0)
            .low(95.0)
            .close(105.0)
            .timestamp(DateTime::default())
            .build();

        assert!(matches!(result, Err(Error::InvalidCandle { .. })));
    }

    #[test]
    fn reject_low_above_open() {
        let result = CandleBuilder::builder()
            .open(100.0)
            .high(110.0)
            .low(101.0)
            .close(105.0)
            .timestamp(DateTime::default())
            .build();

        assert!(matches!(result, Err(Error::InvalidCandle { .. })));
    }

    #[test]
    fn reject_missing_timestamp() {
        let result = CandleBuilder::builder().open(1.0).high(1.0).low(1.0).close(1.0).build();
        assert!(matches!(result, Err(Error::MissingField("timestamp"))));
    }

    #[test]
    fn reject_nan_price() {
        let result = CandleBuilder::builder()
            .open(f64::NAN)
            .high(1.0)
            .low(1.0)
            .close(1.0)
            .timestamp(DateTime::default())
            .build();

        assert!(matches!(result, Err(Error::NonFinite("open", _))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_rejects_invalid_row() {
        let json = r#"{"timestamp":"2024-01-01T00:00:00Z","open":10.0,"high":9.0,"low":8.0,"close":9.5}"#;
        assert!(serde_json::from_str::<Candle>(json).is_err());

        let json = r#"{"timestamp":"2024-01-01T00:00:00Z","open":10.0,"high":11.0,"low":8.0,"close":9.5}"#;
        let candle = serde_json::from_str::<Candle>(json).unwrap();
        assert_eq!(candle.volume(), 0.0);
    }
}
