use crate::engine::History;
use crate::errors::{Error, Result};
use crate::utils::{mean, std_dev};

/// How recent dispersion is measured.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VolatilityMeasure {
    /// Mean of `high - low` (ATR-like).
    #[default]
    AverageRange,
    /// Population standard deviation of the close.
    CloseStdDev,
}

/// Trailing windows used by [`Stats::compute`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsWindows {
    zone: usize,
    volatility: usize,
    trend: usize,
    measure: VolatilityMeasure,
}

impl Default for StatsWindows {
    fn default() -> Self {
        Self {
            zone: 100,
            volatility: 20,
            trend: 15,
            measure: VolatilityMeasure::AverageRange,
        }
    }
}

impl StatsWindows {
    /// Sets the number of bars scanned for support and resistance.
    pub fn zone(mut self, bars: usize) -> Self {
        self.zone = bars;
        self
    }

    /// Sets the number of bars averaged for volatility.
    pub fn volatility(mut self, bars: usize) -> Self {
        self.volatility = bars;
        self
    }

    /// Sets the number of close-to-close differences averaged for the trend.
    pub fn trend(mut self, diffs: usize) -> Self {
        self.trend = diffs;
        self
    }

    /// Sets how volatility is measured.
    pub fn measure(mut self, measure: VolatilityMeasure) -> Self {
        self.measure = measure;
        self
    }

    /// Checks every window is positive.
    pub fn validate(&self) -> Result<()> {
        if self.zone == 0 {
            return Err(Error::InvalidWindow("zone"));
        }
        if self.volatility == 0 {
            return Err(Error::InvalidWindow("volatility"));
        }
        if self.trend == 0 {
            return Err(Error::InvalidWindow("trend"));
        }
        Ok(())
    }
}

/// Summary statistics of a history, fixed for one extrapolation run.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    resistance: f64,
    support: f64,
    volatility: f64,
    trend: f64,
}

impl Stats {
    /// Creates stats from known values.
    ///
    /// ### Returns
    /// The stats, or an error if a value is not finite or `volatility` is negative.
    pub fn new(resistance: f64, support: f64, volatility: f64, trend: f64) -> Result<Self> {
        for (name, value) in [
            ("resistance", resistance),
            ("support", support),
            ("volatility", volatility),
            ("trend", trend),
        ] {
            if !value.is_finite() {
                return Err(Error::NonFinite(name, value));
            }
        }
        if volatility < 0.0 {
            return Err(Error::InvalidParameter("volatility", volatility));
        }

        Ok(Self {
            resistance,
            support,
            volatility,
            trend,
        })
    }

    /// Computes the stats over the trailing windows of `history`.
    ///
    /// Windows longer than the history use every candle. The trend is `0.0`
    /// when the history holds a single candle.
    pub fn compute(history: &History, windows: &StatsWindows) -> Result<Self> {
        windows.validate()?;

        let zone = history.tail(windows.zone);
        let resistance = zone.iter().map(|c| c.high()).fold(f64::NEG_INFINITY, f64::max);
        let support = zone.iter().map(|c| c.low()).fold(f64::INFINITY, f64::min);

        let recent = history.tail(windows.volatility);
        let volatility = match windows.measure {
            VolatilityMeasure::AverageRange => mean(recent.iter().map(|c| c.range())),
            VolatilityMeasure::CloseStdDev => std_dev(recent.iter().map(|c| c.close())),
        }
        .unwrap_or(0.0);

        // n differences need n + 1 closes
        let closes = history.tail(windows.trend.saturating_add(1));
        let trend = mean(closes.windows(2).map(|w| w[1].close() - w[0].close())).unwrap_or(0.0);

        Self::new(resistance, support, volatility, trend)
    }

    /// Max high over the zone window ("supply").
    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Min low over the zone window ("demand").
    pub fn support(&self) -> f64 {
        self.support
    }

    /// Recent dispersion, in price units.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Mean close-to-close change.
    pub fn trend(&self) -> f64 {
        self.trend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Candle, CandleBuilder};
    use chrono::{DateTime, Duration};
    use ta::Next;
    use ta::indicators::{Maximum, Minimum, SimpleMovingAverage};

    fn get_data(n: i64) -> History {
        let start = DateTime::from_timestamp_secs(1515151515).unwrap();
        let data = (0..n)
            .map(|i| {
                let x = i as f64;
                let close = 100.0 + 0.5 * x + 3.0 * (x * 0.7).sin();
                let open = close - (x * 0.3).cos();
                let high = open.max(close) + 0.5 + (x * 1.3).sin().abs();
                let low = open.min(close) - 0.5 - (x * 0.9).cos().abs();
                CandleBuilder::builder()
                    .open(open)
                    .high(high)
                    .low(low)
                    .close(close)
                    .volume(1.0)
                    .timestamp(start + Duration::minutes(5 * i))
                    .build()
                    .unwrap()
            })
            .collect::<Vec<Candle>>();
        History::new(data).unwrap()
    }

    #[test]
    fn zones_match_ta_extrema() {
        let history = get_data(50);
        let windows = StatsWindows::default().zone(10).volatility(5).trend(4);
        let stats = Stats::compute(&history, &windows).unwrap();

        let mut max = Maximum::new(10).unwrap();
        let mut min = Minimum::new(10).unwrap();
        let (mut resistance, mut support) = (0.0, 0.0);
        for candle in history.candles() {
            resistance = max.next(candle.high());
            support = min.next(candle.low());
        }

        assert_eq!(stats.resistance(), resistance);
        assert_eq!(stats.support(), support);
    }

    #[test]
    fn average_range_matches_ta_sma() {
        let history = get_data(50);
        let windows = StatsWindows::default().volatility(20);
        let stats = Stats::compute(&history, &windows).unwrap();

        let mut sma = SimpleMovingAverage::new(20).unwrap();
        let mut expected = 0.0;
        for candle in history.candles() {
            expected = sma.next(candle.range());
        }

        assert!((stats.volatility() - expected).abs() < 1e-9);
    }

    #[test]
    fn trend_is_mean_of_last_diffs() {
        let history = get_data(30);
        let stats = Stats::compute(&history, &StatsWindows::default().trend(15)).unwrap();

        let closes = history.candles().map(|c| c.close()).collect::<Vec<_>>();
        let n = closes.len();
        // the diffs telescope
        let expected = (closes[n - 1] - closes[n - 16]) / 15.0;

        assert!((stats.trend() - expected).abs() < 1e-9);
    }

    #[test]
    fn close_std_dev_measure() {
        let start = DateTime::from_timestamp_secs(1515151515).unwrap();
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                CandleBuilder::builder()
                    .open(close)
                    .high(close)
                    .low(close)
                    .close(close)
                    .timestamp(start + Duration::minutes(i as i64))
                    .build()
                    .unwrap()
            })
            .collect::<Vec<_>>();
        let history = History::new(data).unwrap();
        let windows = StatsWindows::default().measure(VolatilityMeasure::CloseStdDev);
        let stats = Stats::compute(&history, &windows).unwrap();

        assert_eq!(stats.volatility(), 2.0);
    }

    #[test]
    fn single_candle_history() {
        let history = get_data(1);
        let stats = Stats::compute(&history, &StatsWindows::default()).unwrap();
        let candle = history.last();

        assert_eq!(stats.trend(), 0.0);
        assert_eq!(stats.resistance(), candle.high());
        assert_eq!(stats.support(), candle.low());
        assert_eq!(stats.volatility(), candle.range());
    }

    #[test]
    fn reject_zero_window() {
        let history = get_data(5);
        let result = Stats::compute(&history, &StatsWindows::default().zone(0));
        assert!(matches!(result, Err(Error::InvalidWindow("zone"))));
    }

    #[test]
    fn reject_non_finite_stat() {
        assert!(matches!(Stats::new(f64::NAN, 1.0, 1.0, 0.0), Err(Error::NonFinite("resistance", _))));
        assert!(matches!(Stats::new(1.0, 1.0, f64::INFINITY, 0.0), Err(Error::NonFinite("volatility", _))));
        assert!(matches!(Stats::new(1.0, 1.0, -1.0, 0.0), Err(Error::InvalidParameter("volatility", _))));
    }
}
