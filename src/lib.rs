//! # Ghost Bars: synthetic candlestick extrapolation
//!
//! **Ghost Bars** extends a recent candlestick (OHLCV) history with a sequence of synthetic
//! "ghost" candles produced by a biased random walk. The ghosts drift with the recent trend,
//! get pushed back near the support and resistance zones, and carry noise and wicks scaled
//! by the recent volatility.
//!
//! The ghosts are a visual aid for charts. They are not a forecast and carry no predictive
//! validity.
//!
//! ## Core Components
//! | Component      | Description                                                                                 |
//! |----------------|---------------------------------------------------------------------------------------------|
//! | **`Candle`**   | OHLCV data for a single time period, real or synthetic.                                     |
//! | **`History`**  | Non-empty candles with strictly increasing timestamps.                                      |
//! | **`Stats`**    | Resistance, support, volatility and trend over trailing windows.                           |
//! | **`Ghost`**    | The extrapolator: a seeded random walk emitting ghost candles.                             |
//! | **`Reversal`** | Flags a last close pressing against a zone.                                                 |
//! | **`Projector`**| Fetch, stats, extrapolation and signal in one call, degrading to "unavailable" on bad data. |
//! | **`Cache`**    | Caller-owned time-to-live cache of fetched candles.                                         |
//!
//! ## Ghost Recurrence
//! Starting from the last close, each ghost candle:
//! 1. takes a **bias**: rejection near resistance, bounce near support, trend otherwise
//!    (see [`BiasPolicy`](engine::BiasPolicy) for the graded and stacked variants);
//! 2. adds normal **noise** scaled by volatility;
//! 3. opens at the previous close and closes at `open + bias + noise`;
//! 4. grows **wicks** beyond the body (see [`WickPolicy`](engine::WickPolicy)).
//!
//! The same seed always yields the same candles.
//!
//! ## Getting Started
//! ```rust
//! use ghost_bars::prelude::*;
//! use chrono::{DateTime, Duration};
//!
//! fn main() {
//!     let start = DateTime::default();
//!     let candles = (0..50)
//!         .map(|i| {
//!             let close = 2000.0 + i as f64 * 0.2;
//!             CandleBuilder::builder()
//!                 .open(close - 0.1)
//!                 .high(close + 1.0)
//!                 .low(close - 1.0)
//!                 .close(close)
//!                 .volume(1.0)
//!                 .timestamp(start + Duration::minutes(5 * i))
//!                 .build()
//!                 .unwrap()
//!         })
//!         .collect::<Vec<_>>();
//!
//!     let history = History::new(candles).unwrap();
//!     let stats = Stats::compute(&history, &StatsWindows::default()).unwrap();
//!     let last = history.last();
//!
//!     let ghost = Ghost::new(GhostConfig::default()).unwrap();
//!     let ghosts = ghost
//!         .extrapolate(last.close(), last.timestamp(), 40, Duration::minutes(5), &stats, Some(42))
//!         .unwrap();
//!
//!     assert_eq!(ghosts.len(), 40);
//!     assert_eq!(ghosts[0].timestamp(), last.timestamp() + Duration::minutes(5));
//! }
//! ```
//!
//! ## Error Handling
//! Ghost Bars uses a single error type to report:
//! - Invalid candles (high/low not enclosing the body, non-finite prices).
//! - Empty or unordered histories.
//! - Invalid tunables, windows or bar intervals.
//!
//! The [`Projector`](projection::Projector) turns every data-side failure into
//! [`Projection::Unavailable`](projection::Projection::Unavailable) and only returns an error
//! for a misconfigured projector.
//!
//! ## Logging
//! Runs are reported through [`tracing`](https://crates.io/crates/tracing). Install any
//! subscriber to see them.
//!
//! ## License
//! MIT
#![warn(missing_docs)]

/// Core components: candles, history, stats and the ghost extrapolator.
pub mod engine;

/// Error types for the library.
pub mod errors;

/// Caller-owned cache of fetched candles.
pub mod cache;

/// Market data sources and the projection pipeline.
pub mod projection;

/// Utility functions and helpers.
mod utils;

/// Re-exports of commonly used types and traits for convenience.
pub mod prelude {
    pub use super::*;
    pub use crate::cache::*;
    pub use crate::engine::*;
    pub use crate::errors::*;
    pub use crate::projection::*;
}
