/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the library.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The candle data provided is empty. A history requires at least one candle.
    #[error("Candle data is empty: a history requires at least one candle")]
    CandleDataEmpty,

    /// A candle does not satisfy `low <= min(open, close)` and `high >= max(open, close)`.
    #[error("Invalid candle (open: {open}, high: {high}, low: {low}, close: {close})")]
    InvalidCandle {
        /// Open price.
        open: f64,
        /// High price.
        high: f64,
        /// Low price.
        low: f64,
        /// Close price.
        close: f64,
    },

    /// A required builder field was not set.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Candle timestamps are not strictly increasing.
    #[error("Candles are not in strictly increasing time order (at index {0})")]
    UnorderedCandles(usize),

    /// A price or statistic is NaN or infinite.
    #[error("{0} must be finite (got: {1})")]
    NonFinite(&'static str, f64),

    /// A tunable is outside of its valid domain.
    #[error("Invalid parameter {0} (got: {1})")]
    InvalidParameter(&'static str, f64),

    /// A trailing window must contain at least one bar.
    #[error("Window {0} must be positive")]
    InvalidWindow(&'static str),

    /// The bar interval must be strictly positive.
    #[error("Bar interval must be positive (got: {0})")]
    InvalidInterval(chrono::Duration),

    /// A generated timestamp does not fit in the calendar.
    #[error("Timestamp overflow after {0} bars")]
    TimestampOverflow(usize),

    /// The market data provider failed.
    #[error("Data source error: {0}")]
    DataSource(String),

    /// I/O error occurred.
    // utils.rs
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error occurred.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
