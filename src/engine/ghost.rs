//! Ghost bar extrapolation.
//!
//! A ghost bar is a synthetic candle appended after the last real one. Each
//! ghost opens at the previous close and moves by `bias + noise`, where the
//! bias comes from the recent trend or from pressure near the support and
//! resistance zones, and the noise is normal with a scale proportional to
//! the volatility. Wicks are drawn beyond the body according to a
//! [`WickPolicy`].

use crate::engine::{Candle, CandleBuilder, Stats};
use crate::errors::{Error, Result};
use crate::utils::seeded_rng;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::{Exp1, StandardNormal};

/// How the per-bar drift reacts to the support and resistance zones.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BiasPolicy {
    /// Rejection near resistance, else bounce near support, else trend.
    #[default]
    Piecewise,
    /// Zone pressure scaled by proximity, trend faded by the same weight.
    Graded,
    /// Trend plus rejection plus bounce, each zone applied independently.
    Stacked,
}

/// How far wicks extend beyond the candle body, in units of volatility.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WickPolicy {
    /// Constant wick on both sides.
    Fixed {
        /// Wick length.
        scale: f64,
    },
    /// Short wicks with occasional long liquidity sweeps, per side.
    Sweep {
        /// Usual wick length.
        base: f64,
        /// Wick length of a sweep.
        sweep: f64,
        /// Chance of a sweep on each side.
        probability: f64,
    },
    /// Exponentially distributed wicks with the given mean.
    Exponential {
        /// Mean wick length.
        scale: f64,
    },
}

impl Default for WickPolicy {
    fn default() -> Self {
        Self::Sweep {
            base: 0.2,
            sweep: 0.8,
            probability: 0.2,
        }
    }
}

impl WickPolicy {
    fn validate(&self) -> Result<()> {
        let lengths = match *self {
            Self::Fixed { scale } | Self::Exponential { scale } => [scale, scale],
            Self::Sweep { base, sweep, probability } => {
                if !(0.0..=1.0).contains(&probability) {
                    return Err(Error::InvalidParameter("sweep probability", probability));
                }
                [base, sweep]
            }
        };
        match lengths.into_iter().find(|l| !l.is_finite() || *l < 0.0) {
            Some(length) => Err(Error::InvalidParameter("wick length", length)),
            None => Ok(()),
        }
    }

    /// Draws one wick. Always consumes exactly one value from `rng`.
    fn draw(&self, rng: &mut StdRng, volatility: f64) -> f64 {
        match *self {
            Self::Fixed { scale } => {
                let _: f64 = rng.random();
                scale * volatility
            }
            Self::Sweep { base, sweep, probability } => {
                let length = if rng.random::<f64>() < probability { sweep } else { base };
                length * volatility
            }
            Self::Exponential { scale } => {
                let e: f64 = rng.sample(Exp1);
                scale * volatility * e
            }
        }
    }
}

/// Tunables of the ghost random walk.
///
/// The defaults are `proximity_multiple = 2.0`, `trend_multiplier = 2.0`,
/// `noise_scale = 0.4`, `zone_pressure = 0.5`, piecewise bias and sweep wicks.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostConfig {
    proximity_multiple: f64,
    trend_multiplier: f64,
    noise_scale: f64,
    zone_pressure: f64,
    bias: BiasPolicy,
    wicks: WickPolicy,
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            proximity_multiple: 2.0,
            trend_multiplier: 2.0,
            noise_scale: 0.4,
            zone_pressure: 0.5,
            bias: BiasPolicy::Piecewise,
            wicks: WickPolicy::default(),
        }
    }
}

impl GhostConfig {
    /// Sets the distance to a zone, in volatility units, under which the zone pushes back.
    pub fn proximity_multiple(mut self, multiple: f64) -> Self {
        self.proximity_multiple = multiple;
        self
    }

    /// Sets the factor applied to the trend away from the zones.
    pub fn trend_multiplier(mut self, multiplier: f64) -> Self {
        self.trend_multiplier = multiplier;
        self
    }

    /// Sets the noise standard deviation, in volatility units.
    pub fn noise_scale(mut self, scale: f64) -> Self {
        self.noise_scale = scale;
        self
    }

    /// Sets the zone push-back, in volatility units.
    pub fn zone_pressure(mut self, pressure: f64) -> Self {
        self.zone_pressure = pressure;
        self
    }

    /// Sets the bias policy.
    pub fn bias(mut self, policy: BiasPolicy) -> Self {
        self.bias = policy;
        self
    }

    /// Sets the wick policy.
    pub fn wicks(mut self, policy: WickPolicy) -> Self {
        self.wicks = policy;
        self
    }

    /// Checks that every tunable is finite and, except the trend multiplier, non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.trend_multiplier.is_finite() {
            return Err(Error::InvalidParameter("trend_multiplier", self.trend_multiplier));
        }
        for (name, value) in [
            ("proximity_multiple", self.proximity_multiple),
            ("noise_scale", self.noise_scale),
            ("zone_pressure", self.zone_pressure),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(name, value));
            }
        }
        self.wicks.validate()
    }

    /// Returns the drift applied to a bar opening at `current`.
    ///
    /// ### Example
    /// ```rust
    /// use ghost_bars::prelude::*;
    ///
    /// let stats = Stats::new(110.0, 90.0, 1.0, 0.0).unwrap();
    /// let config = GhostConfig::default().proximity_multiple(2.0);
    ///
    /// // one unit under resistance: rejection
    /// assert!(config.bias_at(109.0, &stats) < 0.0);
    /// // one unit above support: bounce
    /// assert!(config.bias_at(91.0, &stats) > 0.0);
    /// ```
    pub fn bias_at(&self, current: f64, stats: &Stats) -> f64 {
        let threshold = self.proximity_multiple * stats.volatility();
        let pressure = self.zone_pressure * stats.volatility();
        let trend = stats.trend() * self.trend_multiplier;
        let to_resistance = stats.resistance() - current;
        let to_support = current - stats.support();

        match self.bias {
            BiasPolicy::Piecewise => {
                if to_resistance < threshold {
                    -pressure
                } else if to_support < threshold {
                    pressure
                } else {
                    trend
                }
            }
            BiasPolicy::Graded => {
                let near_resistance = proximity(to_resistance, threshold);
                let near_support = proximity(to_support, threshold);
                let zone = near_resistance.max(near_support);
                trend * (1.0 - zone) + pressure * (near_support - near_resistance)
            }
            BiasPolicy::Stacked => {
                let mut bias = trend;
                if to_resistance < threshold {
                    bias -= pressure;
                }
                if to_support < threshold {
                    bias += pressure;
                }
                bias
            }
        }
    }
}

/// Weight in `[0, 1]`: 1 at or past the zone, 0 at `threshold` and beyond.
fn proximity(distance: f64, threshold: f64) -> f64 {
    if threshold > 0.0 {
        ((threshold - distance) / threshold).clamp(0.0, 1.0)
    } else if distance < 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Synthetic bar extrapolator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ghost {
    config: GhostConfig,
}

impl From<GhostConfig> for Ghost {
    fn from(config: GhostConfig) -> Self {
        Self { config }
    }
}

impl Ghost {
    /// Creates an extrapolator, validating the config.
    pub fn new(config: GhostConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the tunables.
    pub fn config(&self) -> &GhostConfig {
        &self.config
    }

    /// Returns an unbounded iterator of ghost candles continuing after `last_close` at `last_timestamp`.
    ///
    /// ### Arguments
    /// * `last_close` - Close of the last real candle.
    /// * `last_timestamp` - Timestamp of the last real candle.
    /// * `interval` - Spacing between candles, strictly positive.
    /// * `stats` - Statistics of the real history.
    /// * `seed` - `Some` for a reproducible sequence.
    ///
    /// ### Returns
    /// The iterator, or an error if an input is invalid. Each item is a
    /// `Result`: a step whose prices stop being finite yields an error and
    /// ends the iteration.
    pub fn bars(
        &self,
        last_close: f64,
        last_timestamp: DateTime<Utc>,
        interval: Duration,
        stats: &Stats,
        seed: Option<u64>,
    ) -> Result<GhostBars> {
        self.config.validate()?;
        if !last_close.is_finite() {
            return Err(Error::NonFinite("last_close", last_close));
        }
        if interval <= Duration::zero() {
            return Err(Error::InvalidInterval(interval));
        }
        // re-check stats that may have been built by hand
        let stats = Stats::new(stats.resistance(), stats.support(), stats.volatility(), stats.trend())?;

        Ok(GhostBars {
            rng: seeded_rng(seed),
            config: self.config,
            stats,
            interval,
            current: last_close,
            timestamp: last_timestamp,
            done: false,
        })
    }

    /// Generates exactly `count` ghost candles.
    ///
    /// ### Example
    /// ```rust
    /// use ghost_bars::prelude::*;
    /// use chrono::{DateTime, Duration};
    ///
    /// let stats = Stats::new(2010.0, 1990.0, 2.0, 0.4).unwrap();
    /// let ghost = Ghost::new(GhostConfig::default()).unwrap();
    /// let start = DateTime::default();
    ///
    /// let bars = ghost
    ///     .extrapolate(2000.0, start, 3, Duration::minutes(5), &stats, Some(42))
    ///     .unwrap();
    ///
    /// assert_eq!(bars.len(), 3);
    /// assert_eq!(bars[0].timestamp(), start + Duration::minutes(5));
    /// assert_eq!(bars[0].open(), 2000.0);
    /// ```
    pub fn extrapolate(
        &self,
        last_close: f64,
        last_timestamp: DateTime<Utc>,
        count: usize,
        interval: Duration,
        stats: &Stats,
        seed: Option<u64>,
    ) -> Result<Vec<Candle>> {
        let bars = self.bars(last_close, last_timestamp, interval, stats, seed)?;

        // every timestamp must fit before the first bar is drawn
        if span(interval, count).and_then(|span| last_timestamp.checked_add_signed(span)).is_none() {
            return Err(Error::TimestampOverflow(count));
        }

        let ghosts = bars.take(count).collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            count,
            seed,
            last_close,
            first = ghosts.first().map(|c| c.close()),
            last = ghosts.last().map(|c| c.close()),
            "extrapolated ghost bars"
        );
        Ok(ghosts)
    }
}

/// Total duration of `count` intervals, or `None` if it does not fit in a [`Duration`].
fn span(interval: Duration, count: usize) -> Option<Duration> {
    let nanos = i128::from(interval.num_seconds()) * 1_000_000_000 + i128::from(interval.subsec_nanos());
    let total = nanos.checked_mul(i128::try_from(count).ok()?)?;
    let secs = i64::try_from(total.div_euclid(1_000_000_000)).ok()?;
    let subsec = total.rem_euclid(1_000_000_000) as i64;
    Duration::try_seconds(secs)?.checked_add(&Duration::nanoseconds(subsec))
}

/// Iterator over ghost candles, see [`Ghost::bars`].
///
/// Yields an error if a step produces a non-finite price, then stops. Also
/// stops when the next timestamp would overflow.
#[derive(Debug, Clone)]
pub struct GhostBars {
    rng: StdRng,
    config: GhostConfig,
    stats: Stats,
    interval: Duration,
    current: f64,
    timestamp: DateTime<Utc>,
    done: bool,
}

impl GhostBars {
    /// Close of the last emitted candle (the anchor close before the first one).
    pub fn current(&self) -> f64 {
        self.current
    }

    fn step(&mut self, timestamp: DateTime<Utc>) -> Result<Candle> {
        let volatility = self.stats.volatility();

        let bias = self.config.bias_at(self.current, &self.stats);
        let z: f64 = self.rng.sample(StandardNormal);
        let noise = self.config.noise_scale * volatility * z;

        let open = self.current;
        let close = open + bias + noise;
        let high = open.max(close) + self.config.wicks.draw(&mut self.rng, volatility);
        let low = open.min(close) - self.config.wicks.draw(&mut self.rng, volatility);

        let candle = CandleBuilder::builder()
            .timestamp(timestamp)
            .open(open)
            .high(high)
            .low(low)
            .close(close)
            .build()?;

        self.current = close;
        self.timestamp = timestamp;
        Ok(candle)
    }
}

impl Iterator for GhostBars {
    type Item = Result<Candle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let timestamp = self.timestamp.checked_add_signed(self.interval)?;

        let step = self.step(timestamp);
        if let Err(e) = &step {
            tracing::warn!(current = self.current, error = %e, "ghost walk diverged");
            self.done = true;
        }
        Some(step)
    }
}
