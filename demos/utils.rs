use ghost_bars::prelude::*;

use chrono::{DateTime, Duration};

/// Generates deterministic 5 minute candles.
pub fn generate_sample_candles(max: i32, seed: i32, base_price: f64) -> Vec<Candle> {
    let mut timestamp = DateTime::from_timestamp_secs(1515151515).unwrap_or_default();
    let mut open = base_price;

    (0..max)
        .map(|i| {
            // Base price with trend (+ 0.05*i)
            let base_price = base_price + 0.05 * (i as f64);

            // Price variation using simple trigonometric function with seed
            let variation = 5.0 * ((i as f64 * 0.3 + seed as f64).sin() * 0.5 + 0.5);

            let close = base_price + variation;
            let high = close.max(open) + 0.3 * variation.abs();
            let low = close.min(open) - 0.3 * variation.abs();
            // Volume with seasonal pattern
            let volume = 1000.0 + 500.0 * ((i as f64 * 0.2).sin()).abs();

            let candle = CandleBuilder::builder()
                .open(open)
                .high(high)
                .low(low)
                .close(close)
                .volume(volume)
                .timestamp(timestamp)
                .build()
                .unwrap();

            timestamp += Duration::minutes(5);
            open = close;
            candle
        })
        .collect()
}

/// A market data source serving the sample candles for any symbol.
pub struct SampleSource;

impl MarketData for SampleSource {
    fn candles(&self, _symbol: &str) -> Result<Vec<Candle>> {
        Ok(generate_sample_candles(576, 42, 2000.0))
    }
}

/// Pretty print candles.
#[allow(dead_code)]
pub fn print_candles<'c>(label: &str, candles: impl IntoIterator<Item = &'c Candle>) {
    println!("=== {label} ===");
    for c in candles {
        let arrow = if c.is_bullish() { '+' } else { '-' };
        println!(
            "{} {arrow} O {:.2} H {:.2} L {:.2} C {:.2}",
            c.timestamp().format("%Y-%m-%d %H:%M"),
            c.open(),
            c.high(),
            c.low(),
            c.close()
        );
    }
}

/// Installs a stdout subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
