//! Core extrapolation components.
//!
//! This module provides the fundamental types:
//! - `Candle`: OHLCV data, real or synthetic.
//! - `History`: the validated real candles.
//! - `Stats`: zones, volatility and trend derived from a history.
//! - `Ghost`: the synthetic bar extrapolator.
//! - `Reversal`: the zone reversal signal.

mod candle;
mod ghost;
mod history;
mod signal;
mod stats;

pub use candle::*;
pub use ghost::*;
pub use history::*;
pub use signal::*;
pub use stats::*;
